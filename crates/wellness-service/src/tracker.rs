//! The daily tracker: logging and unlogging activities, and keeping a
//! [`DailyBoard`] in step with the store.
//!
//! A log goes through four stages: provision the user, pre-check for an
//! existing row, insert under the retry policy, then recalculate aggregates.
//! The uniqueness constraint in the store is the real guard; the pre-check
//! only avoids a pointless write.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wellness_core::{
  activity::{default_catalog, Activity},
  board::{CardState, DailyBoard, Totals},
  log::{self, DailyLog, NewDailyLog},
  store::WellnessStore,
  user::{Identity, User, UserSummary},
  StoreError, StoreErrorKind,
};

use crate::{retry::RetryError, Error, Result, WellnessService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogOutcome {
  Logged { log: DailyLog, totals: Totals },
  AlreadyLogged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnlogOutcome {
  Unlogged { totals: Totals },
  NoLogFound,
}

impl<S: WellnessStore> WellnessService<S> {
  /// Return the catalog, seeding the built-in activities if it is empty.
  pub async fn ensure_catalog(&self) -> Result<Vec<Activity>> {
    let activities = self.store.list_activities().await.map_err(Error::store)?;
    if !activities.is_empty() {
      return Ok(activities);
    }

    tracing::info!("activity catalog is empty, seeding defaults");
    self
      .store
      .seed_activities(default_catalog())
      .await
      .map_err(Error::store)
  }

  /// The caller's user row, created with zero totals on first sight.
  pub async fn ensure_user(&self, identity: &Identity) -> Result<User> {
    self
      .store
      .ensure_user(identity.clone())
      .await
      .map_err(Error::store)
  }

  /// Record that the user completed `activity_id` on `date`.
  pub async fn log_activity(
    &self,
    identity:    &Identity,
    activity_id: Uuid,
    date:        NaiveDate,
  ) -> Result<LogOutcome> {
    if date > self.today() {
      return Err(Error::InvalidInput(
        "activities cannot be logged for a future date".into(),
      ));
    }

    let user = self.ensure_user(identity).await?;
    let activity = self
      .store
      .get_activity(activity_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("activity {activity_id}")))?;

    let existing = self
      .store
      .find_log(user.user_id, activity_id, date)
      .await
      .map_err(Error::store)?;
    if existing.is_some() {
      tracing::debug!(user_id = %user.user_id, %activity_id, %date, "already logged");
      return Ok(LogOutcome::AlreadyLogged);
    }

    let input = NewDailyLog {
      user_id: user.user_id,
      activity_id,
      log_date: date,
      points: activity.points,
    };
    let inserted = match self
      .retry
      .run("insert_log", || self.store.insert_log(input))
      .await
    {
      Ok(log) => log,
      Err(RetryError::Permanent(e)) => match e.kind() {
        StoreErrorKind::Duplicate => {
          tracing::debug!(user_id = %user.user_id, %activity_id, %date, "lost insert race");
          return Ok(LogOutcome::AlreadyLogged);
        }
        StoreErrorKind::MissingReference => {
          tracing::warn!(user_id = %user.user_id, error = %e, "log references a missing row");
          return Err(Error::ProfileSettingUp);
        }
        _ => return Err(Error::store(e)),
      },
      Err(e) => return Err(e.into()),
    };

    self.cache.invalidate_day(user.user_id, date);
    tracing::info!(
      user_id = %user.user_id,
      activity = %activity.name,
      %date,
      points = inserted.points,
      "activity logged"
    );

    let fallback = Totals {
      today_points:   i64::from(inserted.points),
      total_points:   user.total_points + i64::from(inserted.points),
      current_streak: user.current_streak,
    };
    let totals = self.settle_totals(&user, date, fallback).await;

    Ok(LogOutcome::Logged { log: inserted, totals })
  }

  /// Remove the user's log of `activity_id` on `date`, if any.
  pub async fn unlog_activity(
    &self,
    user_id:     Uuid,
    activity_id: Uuid,
    date:        NaiveDate,
  ) -> Result<UnlogOutcome> {
    let Some(user) = self.store.get_user(user_id).await.map_err(Error::store)? else {
      return Ok(UnlogOutcome::NoLogFound);
    };

    let removed = self
      .retry
      .run("delete_log", || self.store.delete_log(user_id, activity_id, date))
      .await?;
    if !removed {
      return Ok(UnlogOutcome::NoLogFound);
    }

    self.cache.invalidate_day(user_id, date);
    tracing::info!(%user_id, %activity_id, %date, "activity unlogged");

    let fallback = Totals {
      today_points:   0,
      total_points:   user.total_points,
      current_streak: user.current_streak,
    };
    let totals = self.settle_totals(&user, date, fallback).await;

    Ok(UnlogOutcome::Unlogged { totals })
  }

  /// Complete an activity on `board`: speculative update, store write, then
  /// confirm or roll back.
  pub async fn complete_activity(
    &self,
    board:       &mut DailyBoard,
    identity:    &Identity,
    activity_id: Uuid,
  ) -> Result<LogOutcome> {
    let pending = match board.begin(activity_id) {
      Ok(pending) => pending,
      Err(wellness_core::Error::AlreadyLogged(_)) => return Ok(LogOutcome::AlreadyLogged),
      Err(e) => return Err(e.into()),
    };

    match self.log_activity(identity, activity_id, board.date).await {
      Ok(LogOutcome::Logged { log, totals }) => {
        board.confirm(pending, totals);
        Ok(LogOutcome::Logged { log, totals })
      }
      Ok(LogOutcome::AlreadyLogged) => {
        match self.current_totals(identity.user_id, board.date).await {
          Ok(totals) => board.confirm(pending, totals),
          Err(e) => {
            tracing::warn!(error = %e, "could not read totals after duplicate log");
            board.rollback(pending);
          }
        }
        Ok(LogOutcome::AlreadyLogged)
      }
      Err(e) => {
        board.rollback(pending);
        Err(e)
      }
    }
  }

  /// Explicitly unlog an activity on `board`.
  pub async fn uncomplete_activity(
    &self,
    board:       &mut DailyBoard,
    user_id:     Uuid,
    activity_id: Uuid,
  ) -> Result<UnlogOutcome> {
    match board.card(activity_id).map(|c| c.state) {
      None => return Err(wellness_core::Error::UnknownActivity(activity_id).into()),
      Some(CardState::Saving) => {
        return Err(wellness_core::Error::SaveInFlight(activity_id).into());
      }
      Some(_) => {}
    }

    let outcome = self.unlog_activity(user_id, activity_id, board.date).await?;
    if let UnlogOutcome::Unlogged { totals } = outcome {
      match board.retract(activity_id, totals) {
        Ok(()) => {}
        Err(wellness_core::Error::NotLogged(_)) => board.totals = totals,
        Err(e) => return Err(e.into()),
      }
    }
    Ok(outcome)
  }

  /// A board for `date` built from the catalog and the user's logs.
  pub async fn daily_board(
    &self,
    identity: &Identity,
    date:     NaiveDate,
  ) -> Result<DailyBoard> {
    let activities = self.ensure_catalog().await?;
    let user = self.ensure_user(identity).await?;
    let logs = self
      .store
      .logs_on(user.user_id, date)
      .await
      .map_err(Error::store)?;

    let today_points = log::points_on(&logs, date);
    self.cache.put_day_points(user.user_id, date, today_points);

    let totals = Totals {
      today_points,
      total_points: user.total_points,
      current_streak: user.current_streak,
    };
    Ok(DailyBoard::new(date, activities, &logs, totals))
  }

  /// The caller's summary. Never fails: a read error yields a zero-valued
  /// profile so the page still renders.
  pub async fn profile(&self, identity: &Identity) -> UserSummary {
    if let Some(user) = self.cache.user(identity.user_id) {
      return user.into();
    }

    match self.store.ensure_user(identity.clone()).await {
      Ok(user) => {
        self.cache.put_user(user.clone());
        user.into()
      }
      Err(e) => {
        tracing::warn!(user_id = %identity.user_id, error = %e, "profile read failed");
        User::fresh(identity, Utc::now()).into()
      }
    }
  }

  /// Recalculate the caller's points, streak and team total from scratch.
  pub async fn recalculate(&self, identity: &Identity) -> Result<Totals> {
    let user = self.ensure_user(identity).await?;
    let totals = self.recalculate_totals(user.user_id, self.today()).await?;
    if let Some(team_id) = user.team_id {
      self.recalculate_team_points(team_id).await?;
    }
    Ok(totals)
  }

  /// Aggregates as currently stored, without recalculating.
  pub async fn current_totals(&self, user_id: Uuid, date: NaiveDate) -> Result<Totals> {
    let user = self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("user {user_id}")))?;
    Ok(Totals {
      today_points:   self.today_points(user_id, date).await?,
      total_points:   user.total_points,
      current_streak: user.current_streak,
    })
  }

  async fn recalculate_totals(&self, user_id: Uuid, date: NaiveDate) -> Result<Totals> {
    let total_points = self.recalculate_total_points(user_id).await?;
    let current_streak = self.recalculate_streak(user_id).await?;
    let today_points = self.today_points(user_id, date).await?;
    Ok(Totals { today_points, total_points, current_streak })
  }

  /// Recalculate after a write that already succeeded. Failures are logged
  /// and `fallback` is returned instead.
  async fn settle_totals(&self, user: &User, date: NaiveDate, fallback: Totals) -> Totals {
    let totals = match self.recalculate_totals(user.user_id, date).await {
      Ok(totals) => totals,
      Err(e) => {
        tracing::warn!(
          user_id = %user.user_id,
          error = %e,
          "recalculation failed after write, returning last known totals"
        );
        return fallback;
      }
    };

    if let Some(team_id) = user.team_id
      && let Err(e) = self.recalculate_team_points(team_id).await
    {
      tracing::warn!(%team_id, error = %e, "team points recalculation failed");
    }
    totals
  }
}
