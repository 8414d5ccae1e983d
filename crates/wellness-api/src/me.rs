//! Handlers for the caller's own tracker.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/activities` | Seeds the catalog on first use |
//! | `GET`  | `/me` | Never fails once authenticated |
//! | `GET`  | `/me/board` | Optional `?date=YYYY-MM-DD`, defaults to today |
//! | `GET`  | `/me/points` | Optional `?date=` |
//! | `POST` | `/me/recalculate` | Rebuilds points, streak and team total |
//! | `POST` | `/logs` | Body: `{"activity_id":"…","date":"…"}`; `201` or `200` if already logged |
//! | `DELETE` | `/logs` | Same body; `200` with `no_log_found` if nothing was logged |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wellness_core::{
  activity::Activity,
  board::{DailyBoard, Totals},
  store::WellnessStore,
  user::UserSummary,
};
use wellness_service::{
  WellnessService,
  tracker::{LogOutcome, UnlogOutcome},
};

use crate::{auth::CurrentUser, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
  pub date: Option<NaiveDate>,
}

impl DateParams {
  pub(crate) fn or_today<S: WellnessStore>(&self, svc: &WellnessService<S>) -> NaiveDate {
    self.date.unwrap_or_else(|| svc.today())
  }
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

/// `GET /activities`
pub async fn activities<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Activity>>, ApiError>
where
  S: WellnessStore + 'static,
{
  Ok(Json(svc.ensure_catalog().await?))
}

// ─── Profile ──────────────────────────────────────────────────────────────────

/// `GET /me`
pub async fn profile<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
) -> Json<UserSummary>
where
  S: WellnessStore + 'static,
{
  Json(svc.profile(&identity).await)
}

/// `GET /me/board[?date=<date>]`
pub async fn board<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Query(params): Query<DateParams>,
) -> Result<Json<DailyBoard>, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = params.or_today(&svc);
  Ok(Json(svc.daily_board(&identity, date).await?))
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
  pub date:   NaiveDate,
  pub points: i64,
}

/// `GET /me/points[?date=<date>]`
pub async fn points<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Query(params): Query<DateParams>,
) -> Result<Json<PointsResponse>, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = params.or_today(&svc);
  let points = svc.today_points(identity.user_id, date).await?;
  Ok(Json(PointsResponse { date, points }))
}

/// `POST /me/recalculate`
pub async fn recalculate<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
) -> Result<Json<Totals>, ApiError>
where
  S: WellnessStore + 'static,
{
  Ok(Json(svc.recalculate(&identity).await?))
}

// ─── Logs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LogBody {
  pub activity_id: Uuid,
  #[serde(default)]
  pub date:        Option<NaiveDate>,
}

/// `POST /logs`
pub async fn log<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Json(body): Json<LogBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = body.date.unwrap_or_else(|| svc.today());
  let outcome = svc.log_activity(&identity, body.activity_id, date).await?;
  let status = match outcome {
    LogOutcome::Logged { .. } => StatusCode::CREATED,
    LogOutcome::AlreadyLogged => StatusCode::OK,
  };
  Ok((status, Json(outcome)))
}

/// `DELETE /logs`. Unlogging something never logged is a no-op, not an error.
pub async fn unlog<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Json(body): Json<LogBody>,
) -> Result<Json<UnlogOutcome>, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = body.date.unwrap_or_else(|| svc.today());
  let outcome = svc
    .unlog_activity(identity.user_id, body.activity_id, date)
    .await?;
  Ok(Json(outcome))
}
