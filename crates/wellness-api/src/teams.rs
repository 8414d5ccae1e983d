//! Handlers for `/teams` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/teams` | Standings, highest total first |
//! | `POST` | `/teams` | Body: `{"name":"…","banner_url":null}`; caller becomes first member |
//! | `POST` | `/teams/leave` | `{"team_id":…}`, `null` if the caller had no team |
//! | `GET`  | `/teams/{id}` | Members and daily score, optional `?date=` |
//! | `POST` | `/teams/{id}/join` | `409` when full or already on a team |
//! | `GET`  | `/teams/{id}/score` | Optional `?date=` |
//! | `POST` | `/teams/{id}/wellness-wednesday` | Optional `?date=` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wellness_core::{store::WellnessStore, team::WednesdayCheck};
use wellness_service::{
  WellnessService,
  teams::{TeamDetail, TeamStanding},
};

use crate::{auth::CurrentUser, error::ApiError, me::DateParams};

// ─── List / create ────────────────────────────────────────────────────────────

/// `GET /teams`
pub async fn standings<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<TeamStanding>>, ApiError>
where
  S: WellnessStore + 'static,
{
  Ok(Json(svc.team_standings().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       String,
  #[serde(default)]
  pub banner_url: Option<String>,
}

/// `POST /teams`
pub async fn create<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + 'static,
{
  let team = svc
    .create_team(&identity, &body.name, body.banner_url)
    .await?;
  Ok((StatusCode::CREATED, Json(team)))
}

// ─── Membership ───────────────────────────────────────────────────────────────

/// `POST /teams/{id}/join`
pub async fn join<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(team_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WellnessStore + 'static,
{
  svc.ensure_user(&identity).await?;
  svc.join_team(identity.user_id, team_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct LeaveResponse {
  /// The team that was left.
  pub team_id: Option<Uuid>,
}

/// `POST /teams/leave`
pub async fn leave<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
) -> Result<Json<LeaveResponse>, ApiError>
where
  S: WellnessStore + 'static,
{
  svc.ensure_user(&identity).await?;
  let team_id = svc.leave_team(identity.user_id).await?;
  Ok(Json(LeaveResponse { team_id }))
}

// ─── Detail / scoring ─────────────────────────────────────────────────────────

/// `GET /teams/{id}[?date=<date>]`
pub async fn detail<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(_): CurrentUser,
  Path(team_id): Path<Uuid>,
  Query(params): Query<DateParams>,
) -> Result<Json<TeamDetail>, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = params.or_today(&svc);
  Ok(Json(svc.team_detail(team_id, date).await?))
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
  pub team_id:     Uuid,
  pub date:        NaiveDate,
  pub daily_score: f64,
}

/// `GET /teams/{id}/score[?date=<date>]`
pub async fn score<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(_): CurrentUser,
  Path(team_id): Path<Uuid>,
  Query(params): Query<DateParams>,
) -> Result<Json<ScoreResponse>, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = params.or_today(&svc);
  let daily_score = svc.calculate_team_daily_score(team_id, date).await?;
  Ok(Json(ScoreResponse { team_id, date, daily_score }))
}

/// `POST /teams/{id}/wellness-wednesday[?date=<date>]`
pub async fn wellness_wednesday<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(_): CurrentUser,
  Path(team_id): Path<Uuid>,
  Query(params): Query<DateParams>,
) -> Result<Json<WednesdayCheck>, ApiError>
where
  S: WellnessStore + 'static,
{
  let date = params.or_today(&svc);
  Ok(Json(svc.check_wellness_wednesday_bonus(team_id, date).await?))
}
