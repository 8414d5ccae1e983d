//! Individual leaderboard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wellness_core::{store::WellnessStore, tier::Tier, user::User};

use crate::{Error, Result, WellnessService};

/// Upper bound on leaderboard rows returned by one call.
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub rank:           usize,
  pub user_id:        Uuid,
  pub display_name:   String,
  pub total_points:   i64,
  pub current_streak: u32,
  pub tier:           Tier,
  pub team_id:        Option<Uuid>,
}

impl<S: WellnessStore> WellnessService<S> {
  /// Top `limit` users by points, then streak, then name.
  pub async fn individual_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    let mut users = self.store.list_users().await.map_err(Error::store)?;
    users.sort_by(leaderboard_order);

    Ok(
      users
        .into_iter()
        .take(limit.min(MAX_LEADERBOARD_LIMIT))
        .enumerate()
        .map(|(i, user)| LeaderboardEntry {
          rank:           i + 1,
          user_id:        user.user_id,
          tier:           user.tier(),
          display_name:   user.display_name,
          total_points:   user.total_points,
          current_streak: user.current_streak,
          team_id:        user.team_id,
        })
        .collect(),
    )
  }
}

fn leaderboard_order(a: &User, b: &User) -> std::cmp::Ordering {
  b.total_points
    .cmp(&a.total_points)
    .then_with(|| b.current_streak.cmp(&a.current_streak))
    .then_with(|| a.display_name.cmp(&b.display_name))
}
