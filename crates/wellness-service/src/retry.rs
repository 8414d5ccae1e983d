//! Retry policy for store writes.
//!
//! Only failures classified as
//! [`StoreErrorKind::Transient`](wellness_core::StoreErrorKind::Transient)
//! are retried.
//! Anything else is returned to the caller on the first attempt, so a
//! uniqueness violation is never replayed.

use std::{future::Future, time::Duration};

use wellness_core::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
  /// The same pause before every retry.
  Fixed(Duration),
  /// Doubles after every retry, capped at `max`.
  Exponential { initial: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, including the first. Zero is treated as one.
  pub max_attempts: u32,
  pub backoff:      Backoff,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      backoff:      Backoff::Fixed(Duration::from_millis(500)),
    }
  }
}

/// Why [`RetryPolicy::run`] gave up.
#[derive(Debug)]
pub enum RetryError<E> {
  /// A non-transient failure; not retried.
  Permanent(E),
  /// Every attempt failed transiently.
  Exhausted { attempts: u32, last_error: E },
}

impl RetryPolicy {
  /// A policy that tries once.
  pub fn none() -> Self {
    Self { max_attempts: 1, backoff: Backoff::Fixed(Duration::ZERO) }
  }

  /// Pause before retry number `retry` (1-based).
  pub fn delay_for(&self, retry: u32) -> Duration {
    match self.backoff {
      Backoff::Fixed(delay) => delay,
      Backoff::Exponential { initial, max } => {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        initial.saturating_mul(factor).min(max)
      }
    }
  }

  /// Run `op` until it succeeds, fails permanently or runs out of attempts.
  pub async fn run<T, E, F, Fut>(
    &self,
    operation: &'static str,
    mut op: F,
  ) -> Result<T, RetryError<E>>
  where
    E: StoreError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    let max_attempts = self.max_attempts.max(1);
    let mut attempt = 1;

    loop {
      let err = match op().await {
        Ok(value) => return Ok(value),
        Err(err) => err,
      };

      if !err.kind().is_transient() {
        return Err(RetryError::Permanent(err));
      }
      if attempt >= max_attempts {
        tracing::warn!(
          operation,
          attempts = max_attempts,
          error = %err,
          "retries exhausted"
        );
        return Err(RetryError::Exhausted { attempts: max_attempts, last_error: err });
      }

      let delay = self.delay_for(attempt);
      tracing::debug!(
        operation,
        attempt,
        max_attempts,
        delay_ms = delay.as_millis() as u64,
        error = %err,
        "transient store failure, retrying"
      );
      tokio::time::sleep(delay).await;
      attempt += 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use wellness_core::StoreErrorKind;

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("{0:?}")]
  struct Flaky(StoreErrorKind);

  impl StoreError for Flaky {
    fn kind(&self) -> StoreErrorKind { self.0 }
  }

  fn instant(max_attempts: u32) -> RetryPolicy {
    RetryPolicy { max_attempts, backoff: Backoff::Fixed(Duration::ZERO) }
  }

  #[test]
  fn default_is_three_fixed_half_second_attempts() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay_for(1), Duration::from_millis(500));
    assert_eq!(policy.delay_for(2), Duration::from_millis(500));
  }

  #[test]
  fn exponential_doubles_up_to_cap() {
    let policy = RetryPolicy {
      max_attempts: 10,
      backoff:      Backoff::Exponential {
        initial: Duration::from_millis(100),
        max:     Duration::from_millis(500),
      },
    };
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    assert_eq!(policy.delay_for(4), Duration::from_millis(500));
    assert_eq!(policy.delay_for(40), Duration::from_millis(500));
  }

  #[tokio::test]
  async fn transient_failures_are_retried_until_success() {
    let calls = AtomicU32::new(0);
    let result = instant(3)
      .run("test", || async {
        if calls.fetch_add(1, Ordering::SeqCst) < 2 {
          Err(Flaky(StoreErrorKind::Transient))
        } else {
          Ok(7)
        }
      })
      .await;

    assert_eq!(result.ok(), Some(7));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn permanent_failures_are_not_retried() {
    let calls = AtomicU32::new(0);
    let result: Result<(), _> = instant(5)
      .run("test", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Flaky(StoreErrorKind::Duplicate))
      })
      .await;

    assert!(matches!(
      result,
      Err(RetryError::Permanent(Flaky(StoreErrorKind::Duplicate)))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn exhaustion_reports_attempts_and_last_error() {
    let calls = AtomicU32::new(0);
    let result: Result<(), _> = instant(3)
      .run("test", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Flaky(StoreErrorKind::Transient))
      })
      .await;

    let (attempts, last_error) = match result {
      Err(RetryError::Exhausted { attempts, last_error }) => (attempts, last_error),
      other => panic!("expected exhaustion, got {other:?}"),
    };
    assert_eq!(attempts, 3);
    assert_eq!(last_error.kind(), StoreErrorKind::Transient);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn zero_attempts_still_tries_once() {
    let calls = AtomicU32::new(0);
    let result = instant(0)
      .run("test", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Flaky>(())
      })
      .await;

    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
