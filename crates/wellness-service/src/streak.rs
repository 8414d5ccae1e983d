//! Streak recalculation.

use uuid::Uuid;
use wellness_core::{store::WellnessStore, streak};

use crate::{Error, Result, WellnessService};

impl<S: WellnessStore> WellnessService<S> {
  /// Recompute the user's current streak from their distinct log dates and
  /// store it.
  pub async fn recalculate_streak(&self, user_id: Uuid) -> Result<u32> {
    let dates = self
      .store
      .log_dates(user_id)
      .await
      .map_err(Error::store)?;
    let current = streak::current_streak(&dates, self.today());

    self
      .store
      .set_current_streak(user_id, current)
      .await
      .map_err(Error::store)?;
    self.cache.invalidate_user_record(user_id);

    tracing::debug!(%user_id, streak = current, "recalculated streak");
    Ok(current)
  }
}
