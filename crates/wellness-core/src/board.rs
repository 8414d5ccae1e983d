//! The daily board: one card per catalog activity for a single day.
//!
//! Completing an activity is a speculative-then-confirmed transition:
//!
//! ```text
//!   Unlogged ──begin──▶ Saving ──confirm──▶ Logged
//!       ▲                  │
//!       └─────rollback─────┘
//! ```
//!
//! `Logged` is terminal for the completion toggle. Only an explicit
//! [`DailyBoard::retract`] returns a card to `Unlogged`.
//!
//! The board never talks to storage. The service layer issues the write
//! between [`DailyBoard::begin`] and [`DailyBoard::confirm`] or
//! [`DailyBoard::rollback`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{activity::Activity, log::DailyLog, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
  Unlogged,
  Saving,
  Logged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCard {
  pub activity: Activity,
  pub state:    CardState,
}

/// Authoritative aggregates for the board's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
  pub today_points:   i64,
  pub total_points:   i64,
  pub current_streak: u32,
}

/// Receipt for a speculative completion. Must be settled with
/// [`DailyBoard::confirm`] or [`DailyBoard::rollback`].
#[must_use]
#[derive(Debug)]
pub struct PendingLog {
  activity_id: Uuid,
  before:      Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBoard {
  pub date:   NaiveDate,
  pub cards:  Vec<ActivityCard>,
  pub totals: Totals,
}

impl DailyBoard {
  /// Build a board for `date`. Cards whose activity has a log on `date` start
  /// out `Logged`; logs for other dates are ignored.
  pub fn new(
    date: NaiveDate,
    activities: Vec<Activity>,
    logs: &[DailyLog],
    totals: Totals,
  ) -> Self {
    let cards = activities
      .into_iter()
      .map(|activity| {
        let logged = logs.iter().any(|log| {
          log.log_date == date && log.activity_id == activity.activity_id
        });
        let state = if logged { CardState::Logged } else { CardState::Unlogged };
        ActivityCard { activity, state }
      })
      .collect();
    Self { date, cards, totals }
  }

  pub fn card(&self, activity_id: Uuid) -> Option<&ActivityCard> {
    self.cards.iter().find(|c| c.activity.activity_id == activity_id)
  }

  fn card_mut(&mut self, activity_id: Uuid) -> Option<&mut ActivityCard> {
    self.cards.iter_mut().find(|c| c.activity.activity_id == activity_id)
  }

  pub fn logged_count(&self) -> usize {
    self.cards.iter().filter(|c| c.state == CardState::Logged).count()
  }

  /// `Unlogged → Saving`, crediting the activity's points speculatively.
  pub fn begin(&mut self, activity_id: Uuid) -> Result<PendingLog> {
    let before = self.totals;
    let card = self
      .card_mut(activity_id)
      .ok_or(Error::UnknownActivity(activity_id))?;

    match card.state {
      CardState::Saving => return Err(Error::SaveInFlight(activity_id)),
      CardState::Logged => return Err(Error::AlreadyLogged(activity_id)),
      CardState::Unlogged => {}
    }

    card.state = CardState::Saving;
    let points = i64::from(card.activity.points);
    self.totals.today_points += points;
    self.totals.total_points += points;

    Ok(PendingLog { activity_id, before })
  }

  /// `Saving → Logged`, replacing speculative totals with `totals`.
  pub fn confirm(&mut self, pending: PendingLog, totals: Totals) {
    if let Some(card) = self.card_mut(pending.activity_id) {
      card.state = CardState::Logged;
    }
    self.totals = totals;
  }

  /// `Saving → Unlogged`, restoring the totals seen before `begin`.
  pub fn rollback(&mut self, pending: PendingLog) {
    if let Some(card) = self.card_mut(pending.activity_id) {
      card.state = CardState::Unlogged;
    }
    self.totals = pending.before;
  }

  /// Explicit unlog: `Logged → Unlogged` with fresh authoritative totals.
  pub fn retract(&mut self, activity_id: Uuid, totals: Totals) -> Result<()> {
    let card = self
      .card_mut(activity_id)
      .ok_or(Error::UnknownActivity(activity_id))?;

    match card.state {
      CardState::Logged => card.state = CardState::Unlogged,
      CardState::Saving => return Err(Error::SaveInFlight(activity_id)),
      CardState::Unlogged => return Err(Error::NotLogged(activity_id)),
    }

    self.totals = totals;
    Ok(())
  }
}
