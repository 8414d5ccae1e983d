//! `GET /leaderboard[?limit=<n>]`: individual standings. `limit` defaults to
//! 10 and is capped by the service.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use wellness_core::store::WellnessStore;
use wellness_service::{WellnessService, leaderboard::LeaderboardEntry};

use crate::{auth::CurrentUser, error::ApiError};

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub limit: Option<usize>,
}

pub async fn handler<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(_): CurrentUser,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
  S: WellnessStore + 'static,
{
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
  Ok(Json(svc.individual_leaderboard(limit).await?))
}
