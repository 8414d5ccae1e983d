//! Daily logs: the fact table every aggregate is derived from.
//!
//! At most one log exists per (user, activity, calendar date); backends
//! enforce this with a uniqueness constraint and report violations as
//! [`StoreErrorKind::Duplicate`](crate::StoreErrorKind::Duplicate).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
  pub log_id:       Uuid,
  pub user_id:      Uuid,
  pub activity_id:  Uuid,
  pub log_date:     NaiveDate,
  pub points:       i32,
  /// Server-assigned timestamp of the completion.
  pub completed_at: DateTime<Utc>,
}

/// Input to [`crate::store::WellnessStore::insert_log`].
/// `completed_at` is always set by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDailyLog {
  pub user_id:     Uuid,
  pub activity_id: Uuid,
  pub log_date:    NaiveDate,
  pub points:      i32,
}

/// Sum of `points` over `logs`.
pub fn total_points<'a>(logs: impl IntoIterator<Item = &'a DailyLog>) -> i64 {
  logs.into_iter().map(|log| i64::from(log.points)).sum()
}

/// Sum of `points` over the logs dated `date`.
pub fn points_on<'a>(
  logs: impl IntoIterator<Item = &'a DailyLog>,
  date: NaiveDate,
) -> i64 {
  total_points(logs.into_iter().filter(|log| log.log_date == date))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn log(date: NaiveDate, points: i32) -> DailyLog {
    DailyLog {
      log_id: Uuid::new_v4(),
      user_id: Uuid::nil(),
      activity_id: Uuid::new_v4(),
      log_date: date,
      points,
      completed_at: Utc::now(),
    }
  }

  #[test]
  fn sums_all_and_per_day() {
    let d1 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let d2 = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let logs = vec![log(d1, 5), log(d1, 5), log(d2, 5)];

    assert_eq!(total_points(&logs), 15);
    assert_eq!(points_on(&logs, d1), 10);
    assert_eq!(points_on(&logs, d2), 5);
    assert_eq!(total_points(&Vec::<DailyLog>::new()), 0);
  }
}
