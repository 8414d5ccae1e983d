//! The `WellnessStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `wellness-store-sqlite`).
//! Higher layers (`wellness-service`, `wellness-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Backends own the invariants that need atomicity: one log per
//! (user, activity, date), at most five members per team, and one Wellness
//! Wednesday award per (team, date) credited exactly once.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  activity::{Activity, NewActivity},
  admin::{AdminUser, AppSetting},
  log::{DailyLog, NewDailyLog},
  team::{AwardOutcome, JoinOutcome, NewTeam, Team, TeamAchievement, WellnessWednesdayAward},
  user::{Identity, User},
  StoreError,
};

/// Abstraction over a wellness challenge store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WellnessStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Return the user for `identity`, creating a zero-valued row if none
  /// exists. Concurrent calls for the same identity yield one row.
  fn ensure_user(
    &self,
    identity: Identity,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// All users, in no particular order.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Overwrite the denormalised `total_points` field.
  fn set_total_points(
    &self,
    user_id: Uuid,
    total_points: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite the denormalised `current_streak` field.
  fn set_current_streak(
    &self,
    user_id: Uuid,
    streak: u32,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a user and all of their logs. Returns `false` if absent.
  fn delete_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete all of a user's logs and zero their aggregates, keeping the row
  /// and team membership. Returns `false` if absent.
  fn reset_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Activities ────────────────────────────────────────────────────────

  fn list_activities(
    &self,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  fn get_activity(
    &self,
    activity_id: Uuid,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  /// Insert catalog entries whose names are not yet present, then return the
  /// full catalog.
  fn seed_activities(
    &self,
    entries: Vec<NewActivity>,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  /// Correct an activity's point value. Existing logs keep the points they
  /// were recorded with. Returns `None` if the activity does not exist.
  fn set_activity_points(
    &self,
    activity_id: Uuid,
    points: i32,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  // ── Daily logs ────────────────────────────────────────────────────────

  /// Record a log. Fails with a `Duplicate` error if one already exists for
  /// the same (user, activity, date), and with `MissingReference` if the user
  /// or activity row does not exist.
  fn insert_log(
    &self,
    input: NewDailyLog,
  ) -> impl Future<Output = Result<DailyLog, Self::Error>> + Send + '_;

  fn find_log(
    &self,
    user_id: Uuid,
    activity_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DailyLog>, Self::Error>> + Send + '_;

  /// Delete the matching log. Returns `false` if there was none.
  fn delete_log(
    &self,
    user_id: Uuid,
    activity_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All of a user's logs, most recent `log_date` first.
  fn logs_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DailyLog>, Self::Error>> + Send + '_;

  /// A user's logs for one calendar date.
  fn logs_on(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<DailyLog>, Self::Error>> + Send + '_;

  /// Distinct dates on which the user logged anything, most recent first.
  fn log_dates(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<NaiveDate>, Self::Error>> + Send + '_;

  // ── Teams ─────────────────────────────────────────────────────────────

  /// Create a team and make its creator the first member, atomically.
  /// Fails with `Conflict` if the creator is already on a team and with
  /// `Duplicate` if the name is taken.
  fn create_team(
    &self,
    input: NewTeam,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  fn get_team(
    &self,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  fn list_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  fn team_members(
    &self,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Add a user to a team unless it already has the maximum number of
  /// members. The size check and the update happen in one transaction.
  fn join_team(
    &self,
    user_id: Uuid,
    team_id: Uuid,
  ) -> impl Future<Output = Result<JoinOutcome, Self::Error>> + Send + '_;

  /// Remove a user from their team. Returns the team they left, if any.
  fn leave_team(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  /// Overwrite the denormalised `total_points` field of a team.
  fn set_team_points(
    &self,
    team_id: Uuid,
    total_points: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn team_achievements(
    &self,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Vec<TeamAchievement>, Self::Error>> + Send + '_;

  fn find_wednesday_award(
    &self,
    team_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<WellnessWednesdayAward>, Self::Error>>
  + Send
  + '_;

  /// Record a Wellness Wednesday award, its achievement record and the team
  /// points increment in one transaction. If an award already exists for
  /// (team, date) nothing is written and the existing award is returned.
  fn award_wednesday_bonus(
    &self,
    team_id: Uuid,
    date: NaiveDate,
    bonus_points: i64,
  ) -> impl Future<Output = Result<AwardOutcome, Self::Error>> + Send + '_;

  // ── Admins ────────────────────────────────────────────────────────────

  /// Whether `email` is in the persisted admin table.
  fn is_admin(
    &self,
    email: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Idempotently add an admin.
  fn add_admin(
    &self,
    email: String,
  ) -> impl Future<Output = Result<AdminUser, Self::Error>> + Send + '_;

  /// Returns `false` if the email was not present.
  fn remove_admin(
    &self,
    email: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_admins(
    &self,
  ) -> impl Future<Output = Result<Vec<AdminUser>, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  fn get_setting(
    &self,
    key: String,
  ) -> impl Future<Output = Result<Option<AppSetting>, Self::Error>> + Send + '_;

  fn put_setting(
    &self,
    key: String,
    value: String,
  ) -> impl Future<Output = Result<AppSetting, Self::Error>> + Send + '_;
}
