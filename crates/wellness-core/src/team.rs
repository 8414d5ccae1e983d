//! Teams, team bonuses, and the pure scoring rules over them.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of members on one team.
pub const MAX_TEAM_SIZE: usize = 5;

/// Points each member must log on a Wednesday for the team bonus.
pub const WEDNESDAY_MEMBER_THRESHOLD: i64 = 20;

/// Bonus awarded per member when a team qualifies.
pub const WEDNESDAY_BONUS_PER_MEMBER: i64 = 10;

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub team_id:      Uuid,
  pub name:         String,
  /// Denormalised: member points plus awarded bonuses.
  pub total_points: i64,
  pub creator_id:   Uuid,
  pub banner_url:   Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::WellnessStore::create_team`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
  pub name:       String,
  pub creator_id: Uuid,
  pub banner_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
  WellnessWednesday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAchievement {
  pub achievement_id: Uuid,
  pub team_id:        Uuid,
  pub kind:           AchievementKind,
  pub points:         i64,
  pub achieved_on:    NaiveDate,
  pub recorded_at:    DateTime<Utc>,
}

/// A Wellness Wednesday bonus. At most one exists per (team, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessWednesdayAward {
  pub award_id:     Uuid,
  pub team_id:      Uuid,
  pub award_date:   NaiveDate,
  pub bonus_points: i64,
  pub recorded_at:  DateTime<Utc>,
}

/// Result of [`crate::store::WellnessStore::award_wednesday_bonus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwardOutcome {
  /// This call recorded the award and credited the team.
  Awarded(WellnessWednesdayAward),
  /// An award already existed; nothing was credited.
  AlreadyAwarded(WellnessWednesdayAward),
}

/// Result of [`crate::store::WellnessStore::join_team`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
  Joined,
  TeamFull,
  AlreadyOnTeam(Uuid),
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// Mean of the members' points for one day; `0.0` for an empty team.
pub fn daily_score(member_points: &[i64]) -> f64 {
  if member_points.is_empty() {
    return 0.0;
  }
  let sum: i64 = member_points.iter().sum();
  sum as f64 / member_points.len() as f64
}

/// Why a team does not qualify for the Wednesday bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
  NotWednesday,
  TeamIncomplete,
  MemberBelowThreshold,
}

impl IneligibleReason {
  pub fn message(self) -> &'static str {
    match self {
      Self::NotWednesday => "the bonus is only available on Wednesdays",
      Self::TeamIncomplete => "the team needs five members to qualify",
      Self::MemberBelowThreshold => {
        "every member needs at least 20 points today to qualify"
      }
    }
  }
}

/// Decide whether a team qualifies for the bonus on `date`, given each
/// member's points for that day. Returns the bonus to award.
pub fn wednesday_bonus(
  date: NaiveDate,
  member_points: &[i64],
) -> Result<i64, IneligibleReason> {
  if date.weekday() != Weekday::Wed {
    return Err(IneligibleReason::NotWednesday);
  }
  if member_points.len() < MAX_TEAM_SIZE {
    return Err(IneligibleReason::TeamIncomplete);
  }
  if member_points.iter().any(|p| *p < WEDNESDAY_MEMBER_THRESHOLD) {
    return Err(IneligibleReason::MemberBelowThreshold);
  }
  Ok(WEDNESDAY_BONUS_PER_MEMBER * member_points.len() as i64)
}

/// Outcome of a Wellness Wednesday check as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WednesdayCheck {
  Ineligible { reason: IneligibleReason },
  Awarded { bonus_points: i64 },
  AlreadyAwarded { bonus_points: i64 },
}

impl WednesdayCheck {
  pub fn is_eligible(&self) -> bool { !matches!(self, Self::Ineligible { .. }) }

  pub fn bonus_points(&self) -> Option<i64> {
    match self {
      Self::Ineligible { .. } => None,
      Self::Awarded { bonus_points } | Self::AlreadyAwarded { bonus_points } => {
        Some(*bonus_points)
      }
    }
  }
}

impl From<AwardOutcome> for WednesdayCheck {
  fn from(outcome: AwardOutcome) -> Self {
    match outcome {
      AwardOutcome::Awarded(a) => Self::Awarded { bonus_points: a.bonus_points },
      AwardOutcome::AlreadyAwarded(a) => {
        Self::AlreadyAwarded { bonus_points: a.bonus_points }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // 2026-03-18 is a Wednesday.
  fn wednesday() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 18).unwrap() }

  #[test]
  fn empty_team_scores_zero() {
    assert_eq!(daily_score(&[]), 0.0);
  }

  #[test]
  fn score_is_member_mean() {
    assert_eq!(daily_score(&[10, 20, 30]), 20.0);
    assert_eq!(daily_score(&[5, 10]), 7.5);
  }

  #[test]
  fn full_team_over_threshold_earns_fifty() {
    assert_eq!(wednesday_bonus(wednesday(), &[20, 25, 30, 20, 40]), Ok(50));
  }

  #[test]
  fn rejects_other_weekdays() {
    let thursday = wednesday().succ_opt().unwrap();
    assert_eq!(
      wednesday_bonus(thursday, &[40; 5]),
      Err(IneligibleReason::NotWednesday)
    );
  }

  #[test]
  fn rejects_small_teams() {
    assert_eq!(
      wednesday_bonus(wednesday(), &[40; 4]),
      Err(IneligibleReason::TeamIncomplete)
    );
  }

  #[test]
  fn rejects_when_any_member_is_short() {
    assert_eq!(
      wednesday_bonus(wednesday(), &[40, 40, 40, 40, 15]),
      Err(IneligibleReason::MemberBelowThreshold)
    );
  }

  #[test]
  fn check_serialises_with_status_tag() {
    let check = WednesdayCheck::AlreadyAwarded { bonus_points: 50 };
    let json = serde_json::to_value(&check).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "status": "already_awarded", "bonus_points": 50 })
    );
    assert!(check.is_eligible());
    assert_eq!(check.bonus_points(), Some(50));
  }
}
