//! Consecutive-day streaks.
//!
//! A streak is the number of consecutive calendar days, ending today, with at
//! least one logged activity. Several logs on the same day count once.
//!
//! Two rules soften the boundary:
//!
//! - **Grace window.** If nothing is logged today but yesterday is, the streak
//!   is counted back from yesterday, so it survives until the participant has
//!   missed a whole day.
//! - **Last day counts.** A participant whose most recent log is older than
//!   yesterday still has a streak of 1. Only a participant with no logs at all
//!   has a streak of 0.

use chrono::NaiveDate;

/// Compute the current streak from a participant's log dates.
///
/// `dates` may be unsorted and contain duplicates. Dates after `today` are
/// ignored entirely, so only future logs give a streak of 0.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
  let mut distinct: Vec<_> = dates.iter().copied().filter(|d| *d <= today).collect();
  distinct.sort_unstable_by(|a, b| b.cmp(a));
  distinct.dedup();

  if distinct.is_empty() {
    return 0;
  }

  let yesterday = today.pred_opt();
  let anchor = if distinct.contains(&today) {
    today
  } else if let Some(y) = yesterday.filter(|y| distinct.contains(y)) {
    y
  } else {
    return 1;
  };

  count_back_from(&distinct, anchor)
}

/// Count consecutive days in `descending` ending at `anchor`.
fn count_back_from(descending: &[NaiveDate], anchor: NaiveDate) -> u32 {
  let mut streak = 0;
  let mut expected = Some(anchor);

  for date in descending {
    if Some(*date) != expected {
      break;
    }
    streak += 1;
    expected = date.pred_opt();
  }

  streak
}
