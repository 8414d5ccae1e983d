//! Orchestration layer for the wellness challenge.
//!
//! [`WellnessService`] wraps any [`WellnessStore`] and implements the
//! multi-step operations: logging with retries and aggregate recalculation,
//! streaks, team scoring and bonuses, leaderboards and admin actions. Each
//! concern lives in its own module as an `impl` block on the service.

pub mod admin;
pub mod cache;
pub mod error;
pub mod leaderboard;
pub mod points;
pub mod retry;
pub mod streak;
pub mod teams;
pub mod tracker;

#[cfg(test)]
mod flaky_store;

use std::sync::Arc;

use chrono::NaiveDate;
use wellness_core::{
  admin::AdminSeed,
  clock::{Clock, SystemClock},
  store::WellnessStore,
};

pub use cache::ReadCache;
pub use error::{Error, Result};
pub use retry::{Backoff, RetryPolicy};

pub struct WellnessService<S> {
  store:  Arc<S>,
  clock:  Arc<dyn Clock>,
  cache:  ReadCache,
  retry:  RetryPolicy,
  admins: AdminSeed,
}

impl<S: WellnessStore> WellnessService<S> {
  /// A service with the system clock, default retry policy, default cache
  /// TTL and only the bootstrap admins.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      clock: Arc::new(SystemClock),
      cache: ReadCache::default(),
      retry: RetryPolicy::default(),
      admins: AdminSeed::default(),
    }
  }

  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn with_cache(mut self, cache: ReadCache) -> Self {
    self.cache = cache;
    self
  }

  pub fn with_admin_seed(mut self, admins: AdminSeed) -> Self {
    self.admins = admins;
    self
  }

  pub fn store(&self) -> &S { &self.store }

  /// The current calendar date according to the configured clock.
  pub fn today(&self) -> NaiveDate { self.clock.today() }
}
