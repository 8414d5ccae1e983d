//! Handlers for `/admin` endpoints. Every route answers `403` to callers
//! without admin rights.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/admin/admins` | Seeded and persisted admins |
//! | `POST`   | `/admin/admins` | Body: `{"email":"…"}` |
//! | `DELETE` | `/admin/admins/{email}` | Seeded admins are refused with `400` |
//! | `DELETE` | `/admin/users/{id}` | Deletes the user and their logs |
//! | `POST`   | `/admin/users/{id}/reset` | Clears logs and zeroes aggregates |
//! | `PUT`    | `/admin/activities/{id}/points` | Body: `{"points":5}` |
//! | `GET`    | `/admin/settings/{key}` | |
//! | `PUT`    | `/admin/settings/{key}` | Body: `{"value":"…"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use wellness_core::{
  activity::Activity,
  admin::AppSetting,
  store::WellnessStore,
};
use wellness_service::{WellnessService, admin::AdminRoster};

use crate::{auth::CurrentUser, error::ApiError};

// ─── Admins ───────────────────────────────────────────────────────────────────

/// `GET /admin/admins`
pub async fn list_admins<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
) -> Result<Json<AdminRoster>, ApiError>
where
  S: WellnessStore + 'static,
{
  Ok(Json(svc.list_admins(&identity).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddAdminBody {
  pub email: String,
}

/// `POST /admin/admins`
pub async fn add_admin<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Json(body): Json<AddAdminBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + 'static,
{
  let admin = svc.add_admin(&identity, &body.email).await?;
  Ok((StatusCode::CREATED, Json(admin)))
}

/// `DELETE /admin/admins/{email}`
pub async fn remove_admin<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(email): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: WellnessStore + 'static,
{
  svc.remove_admin(&identity, &email).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Users ────────────────────────────────────────────────────────────────────

/// `DELETE /admin/users/{id}`
pub async fn delete_user<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WellnessStore + 'static,
{
  svc.delete_user(&identity, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /admin/users/{id}/reset`
pub async fn reset_user<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WellnessStore + 'static,
{
  svc.reset_user(&identity, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PointsBody {
  pub points: i32,
}

/// `PUT /admin/activities/{id}/points`
pub async fn activity_points<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(activity_id): Path<Uuid>,
  Json(body): Json<PointsBody>,
) -> Result<Json<Activity>, ApiError>
where
  S: WellnessStore + 'static,
{
  let activity = svc
    .correct_activity_points(&identity, activity_id, body.points)
    .await?;
  Ok(Json(activity))
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// `GET /admin/settings/{key}`
pub async fn get_setting<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(key): Path<String>,
) -> Result<Json<AppSetting>, ApiError>
where
  S: WellnessStore + 'static,
{
  Ok(Json(svc.get_setting(&identity, &key).await?))
}

#[derive(Debug, Deserialize)]
pub struct SettingBody {
  pub value: String,
}

/// `PUT /admin/settings/{key}`
pub async fn put_setting<S>(
  State(svc): State<Arc<WellnessService<S>>>,
  CurrentUser(identity): CurrentUser,
  Path(key): Path<String>,
  Json(body): Json<SettingBody>,
) -> Result<Json<AppSetting>, ApiError>
where
  S: WellnessStore + 'static,
{
  Ok(Json(svc.put_setting(&identity, &key, body.value).await?))
}
