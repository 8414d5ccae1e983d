//! Per-process TTL read cache.
//!
//! Holds the day's points per `(user, date)` and user records per user. The
//! store stays authoritative: every write that touches a user drops that
//! user's entries before returning.

use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;
use uuid::Uuid;
use wellness_core::user::User;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

const MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
pub struct ReadCache {
  day_points: Cache<(Uuid, NaiveDate), i64>,
  users:      Cache<Uuid, User>,
}

impl ReadCache {
  pub fn new(ttl: Duration) -> Self {
    Self {
      day_points: Cache::builder()
        .max_capacity(MAX_ENTRIES)
        .time_to_live(ttl)
        .support_invalidation_closures()
        .build(),
      users:      Cache::builder()
        .max_capacity(MAX_ENTRIES)
        .time_to_live(ttl)
        .build(),
    }
  }

  pub fn day_points(&self, user_id: Uuid, date: NaiveDate) -> Option<i64> {
    let hit = self.day_points.get(&(user_id, date));
    if hit.is_some() {
      tracing::debug!(%user_id, %date, "day points cache hit");
    }
    hit
  }

  pub fn put_day_points(&self, user_id: Uuid, date: NaiveDate, points: i64) {
    self.day_points.insert((user_id, date), points);
  }

  pub fn user(&self, user_id: Uuid) -> Option<User> {
    let hit = self.users.get(&user_id);
    if hit.is_some() {
      tracing::debug!(%user_id, "user cache hit");
    }
    hit
  }

  pub fn put_user(&self, user: User) { self.users.insert(user.user_id, user); }

  pub fn invalidate_user_record(&self, user_id: Uuid) { self.users.invalidate(&user_id); }

  /// Drop the user record and that one day's points.
  pub fn invalidate_day(&self, user_id: Uuid, date: NaiveDate) {
    self.users.invalidate(&user_id);
    self.day_points.invalidate(&(user_id, date));
  }

  /// Drop everything cached for `user_id`.
  pub fn invalidate_user(&self, user_id: Uuid) {
    self.users.invalidate(&user_id);
    if let Err(e) = self
      .day_points
      .invalidate_entries_if(move |(cached, _), _| *cached == user_id)
    {
      tracing::warn!(%user_id, error = %e, "predicate invalidation failed, clearing day points");
      self.day_points.invalidate_all();
    }
  }
}

impl Default for ReadCache {
  fn default() -> Self { Self::new(DEFAULT_CACHE_TTL) }
}
