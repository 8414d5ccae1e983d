//! Points aggregation over daily logs.

use chrono::NaiveDate;
use uuid::Uuid;
use wellness_core::{log, store::WellnessStore};

use crate::{Error, Result, WellnessService};

impl<S: WellnessStore> WellnessService<S> {
  /// Sum every log the user has, store it as `total_points` and return it.
  pub async fn recalculate_total_points(&self, user_id: Uuid) -> Result<i64> {
    let logs = self
      .store
      .logs_for_user(user_id)
      .await
      .map_err(Error::store)?;
    let total = log::total_points(&logs);

    self
      .store
      .set_total_points(user_id, total)
      .await
      .map_err(Error::store)?;
    self.cache.invalidate_user_record(user_id);

    tracing::debug!(%user_id, total, "recalculated total points");
    Ok(total)
  }

  /// Points the user logged on `date`, summed from log rows.
  pub async fn today_points(&self, user_id: Uuid, date: NaiveDate) -> Result<i64> {
    if let Some(points) = self.cache.day_points(user_id, date) {
      return Ok(points);
    }

    let points = self.stored_day_points(user_id, date).await?;
    self.cache.put_day_points(user_id, date, points);
    Ok(points)
  }

  /// Like [`Self::today_points`] but always read from the store. Used where
  /// a stale value would be written back as a decision.
  pub(crate) async fn stored_day_points(&self, user_id: Uuid, date: NaiveDate) -> Result<i64> {
    let logs = self
      .store
      .logs_on(user_id, date)
      .await
      .map_err(Error::store)?;
    Ok(log::points_on(&logs, date))
  }
}
