//! JSON REST API for the wellness challenge.
//!
//! Exposes an axum [`Router`] backed by a [`WellnessService`] over any
//! [`WellnessStore`]. Callers are identified by headers set by an upstream
//! gateway (see [`auth`]); TLS and transport are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", wellness_api::api_router(service.clone()))
//! ```

pub mod admin;
pub mod auth;
pub mod error;
pub mod leaderboard;
pub mod me;
pub mod teams;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use wellness_core::store::WellnessStore;
use wellness_service::WellnessService;

pub use auth::CurrentUser;
pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<WellnessService<S>>) -> Router<()>
where
  S: WellnessStore + 'static,
{
  Router::new()
    // Tracker
    .route("/activities", get(me::activities::<S>))
    .route("/me", get(me::profile::<S>))
    .route("/me/board", get(me::board::<S>))
    .route("/me/points", get(me::points::<S>))
    .route("/me/recalculate", post(me::recalculate::<S>))
    .route("/logs", post(me::log::<S>).delete(me::unlog::<S>))
    // Teams
    .route("/teams", get(teams::standings::<S>).post(teams::create::<S>))
    .route("/teams/leave", post(teams::leave::<S>))
    .route("/teams/{id}", get(teams::detail::<S>))
    .route("/teams/{id}/join", post(teams::join::<S>))
    .route("/teams/{id}/score", get(teams::score::<S>))
    .route("/teams/{id}/wellness-wednesday", post(teams::wellness_wednesday::<S>))
    // Leaderboard
    .route("/leaderboard", get(leaderboard::handler::<S>))
    // Admin
    .route(
      "/admin/admins",
      get(admin::list_admins::<S>).post(admin::add_admin::<S>),
    )
    .route("/admin/admins/{email}", delete(admin::remove_admin::<S>))
    .route("/admin/users/{id}", delete(admin::delete_user::<S>))
    .route("/admin/users/{id}/reset", post(admin::reset_user::<S>))
    .route("/admin/activities/{id}/points", put(admin::activity_points::<S>))
    .route(
      "/admin/settings/{key}",
      get(admin::get_setting::<S>).put(admin::put_setting::<S>),
    )
    .with_state(service)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
  };
  use chrono::NaiveDate;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use wellness_core::clock::FixedClock;
  use wellness_service::RetryPolicy;
  use wellness_store_sqlite::SqliteStore;

  use super::*;
  use crate::auth::{USER_EMAIL_HEADER, USER_ID_HEADER, USER_NAME_HEADER};

  async fn make_router() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let svc = WellnessService::new(Arc::new(store))
      .with_clock(FixedClock(NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()))
      .with_retry_policy(RetryPolicy::none());
    api_router(Arc::new(svc))
  }

  struct Caller {
    id:    Uuid,
    email: String,
  }

  fn caller(email: &str) -> Caller { Caller { id: Uuid::new_v4(), email: email.into() } }

  async fn send(
    router: &Router,
    who: Option<&Caller>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(who) = who {
      req = req
        .header(USER_ID_HEADER, who.id.to_string())
        .header(USER_EMAIL_HEADER, &who.email)
        .header(USER_NAME_HEADER, "Tester");
    }
    let req = match body {
      Some(body) => req
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap(),
      None => req.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn first_activity(router: &Router, who: &Caller) -> String {
    let (status, body) = send(router, Some(who), "GET", "/activities", None).await;
    assert_eq!(status, StatusCode::OK);
    body[0]["activity_id"].as_str().unwrap().to_owned()
  }

  #[tokio::test]
  async fn missing_identity_is_401_with_sign_in_hint() {
    let router = make_router().await;
    let (status, body) = send(&router, None, "GET", "/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["remediation"], "sign_in");
  }

  #[tokio::test]
  async fn malformed_user_id_is_401() {
    let router = make_router().await;
    let req = Request::builder()
      .uri("/me")
      .header(USER_ID_HEADER, "not-a-uuid")
      .header(USER_EMAIL_HEADER, "a@example.com")
      .body(Body::empty())
      .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn profile_starts_at_zero() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let (status, body) = send(&router, Some(&who), "GET", "/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["total_points"], 0);
    assert_eq!(body["user"]["current_streak"], 0);
    assert_eq!(body["tier"], "seedling");
  }

  #[tokio::test]
  async fn log_then_points_then_duplicate() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let activity_id = first_activity(&router, &who).await;

    let (status, body) = send(
      &router,
      Some(&who),
      "POST",
      "/logs",
      Some(json!({ "activity_id": activity_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "logged");
    assert_eq!(body["totals"]["today_points"], 5);
    assert_eq!(body["totals"]["current_streak"], 1);

    let (status, body) = send(&router, Some(&who), "GET", "/me/points", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 5);

    let (status, body) = send(
      &router,
      Some(&who),
      "POST",
      "/logs",
      Some(json!({ "activity_id": activity_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already_logged");
  }

  #[tokio::test]
  async fn unlog_without_log_is_a_successful_no_op() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let activity_id = first_activity(&router, &who).await;

    let (status, body) = send(
      &router,
      Some(&who),
      "DELETE",
      "/logs",
      Some(json!({ "activity_id": activity_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_log_found");
  }

  #[tokio::test]
  async fn future_log_is_400() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let activity_id = first_activity(&router, &who).await;

    let (status, _) = send(
      &router,
      Some(&who),
      "POST",
      "/logs",
      Some(json!({ "activity_id": activity_id, "date": "2026-03-19" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn board_lists_every_activity() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let (status, body) =
      send(&router, Some(&who), "GET", "/me/board?date=2026-03-17", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2026-03-17");
    assert!(!body["cards"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn team_create_join_and_leave() {
    let router = make_router().await;
    let ash = caller("ash@example.com");
    let birch = caller("birch@example.com");

    let (status, team) = send(
      &router,
      Some(&ash),
      "POST",
      "/teams",
      Some(json!({ "name": "Sprouts" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = team["team_id"].as_str().unwrap().to_owned();

    let (status, _) =
      send(&router, Some(&birch), "POST", &format!("/teams/{team_id}/join"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&router, Some(&birch), "POST", &format!("/teams/{team_id}/join"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, detail) =
      send(&router, Some(&ash), "GET", &format!("/teams/{team_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["members"].as_array().unwrap().len(), 2);

    let (status, body) = send(&router, Some(&birch), "POST", "/teams/leave", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_id"], team_id.as_str());
    let (status, body) = send(&router, Some(&birch), "POST", "/teams/leave", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_id"], Value::Null);
  }

  #[tokio::test]
  async fn unknown_team_is_404() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let uri = format!("/teams/{}", Uuid::new_v4());
    let (status, _) = send(&router, Some(&who), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn wednesday_check_reports_ineligible_team() {
    let router = make_router().await;
    let ash = caller("ash@example.com");
    let (_, team) = send(
      &router,
      Some(&ash),
      "POST",
      "/teams",
      Some(json!({ "name": "Solo" })),
    )
    .await;
    let team_id = team["team_id"].as_str().unwrap();

    let uri = format!("/teams/{team_id}/wellness-wednesday");
    let (status, body) = send(&router, Some(&ash), "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ineligible");
  }

  #[tokio::test]
  async fn leaderboard_is_listed() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    send(&router, Some(&who), "GET", "/me", None).await;
    let (status, body) = send(&router, Some(&who), "GET", "/leaderboard?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn admin_routes_refuse_regular_users() {
    let router = make_router().await;
    let who = caller("ash@example.com");
    let (status, _) = send(&router, Some(&who), "GET", "/admin/admins", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn admin_can_grant_and_manage_settings() {
    let router = make_router().await;
    let root = caller("wellness-admin@localhost");

    let (status, body) = send(
      &router,
      Some(&root),
      "POST",
      "/admin/admins",
      Some(json!({ "email": "Lead@Example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "lead@example.com");

    let lead = caller("lead@example.com");
    let (status, body) = send(
      &router,
      Some(&lead),
      "PUT",
      "/admin/settings/challenge_name",
      Some(json!({ "value": "Spring into Wellness" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "Spring into Wellness");

    let (status, _) = send(
      &router,
      Some(&lead),
      "DELETE",
      "/admin/admins/wellness-admin@localhost",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
