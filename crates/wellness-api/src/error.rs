//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": "...", "remediation": "..."}`; the
//! remediation key is omitted when there is nothing the caller can do.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use wellness_core::StoreErrorKind;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("sign in required: {0}")]
  Unauthenticated(String),

  #[error(transparent)]
  Service(#[from] wellness_service::Error),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    use wellness_service::Error as E;

    match self {
      ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
      ApiError::Service(e) => match e {
        E::Unauthorized => StatusCode::FORBIDDEN,
        E::ProfileSettingUp => StatusCode::CONFLICT,
        E::NotFound(_) => StatusCode::NOT_FOUND,
        E::TeamFull(_) | E::AlreadyOnTeam(_) => StatusCode::CONFLICT,
        E::InvalidInput(_) => StatusCode::BAD_REQUEST,
        E::Board(_) => StatusCode::CONFLICT,
        E::RetriesExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        E::Store { kind: StoreErrorKind::Transient, .. } => StatusCode::SERVICE_UNAVAILABLE,
        E::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn remediation(&self) -> Option<&'static str> {
    use wellness_service::Error as E;

    match self {
      ApiError::Unauthenticated(_) => Some("sign_in"),
      ApiError::Service(E::ProfileSettingUp) => Some("refresh"),
      ApiError::Service(E::RetriesExhausted { .. }) => Some("retry"),
      ApiError::Service(E::Store { kind: StoreErrorKind::Transient, .. }) => Some("retry"),
      _ => None,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = ?self, "request failed");
    }

    let mut body = json!({ "error": self.to_string() });
    if let Some(remediation) = self.remediation() {
      body["remediation"] = remediation.into();
    }
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_setup_suggests_refresh() {
    let err = ApiError::from(wellness_service::Error::ProfileSettingUp);
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.remediation(), Some("refresh"));
  }

  #[test]
  fn exhausted_retries_are_unavailable() {
    let err = ApiError::from(wellness_service::Error::RetriesExhausted {
      attempts:   3,
      last_error: "database is locked".into(),
    });
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err.remediation(), Some("retry"));
  }

  #[test]
  fn unauthorized_admin_action_is_forbidden() {
    let err = ApiError::from(wellness_service::Error::Unauthorized);
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.remediation(), None);
  }
}
