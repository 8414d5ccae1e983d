//! Caller identity, as asserted by the upstream authentication gateway.
//!
//! The gateway is trusted: it strips any client-supplied identity headers and
//! sets its own.
//!
//! | Header | Required |
//! |--------|----------|
//! | `x-user-id` | yes, a UUID |
//! | `x-user-email` | yes |
//! | `x-user-name` | no |

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;
use wellness_core::user::Identity;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Extractor for the authenticated caller. Rejects with `401`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<St> FromRequestParts<St> for CurrentUser
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
    let user_id = header(parts, USER_ID_HEADER)
      .ok_or_else(|| ApiError::Unauthenticated(format!("missing {USER_ID_HEADER}")))?;
    let user_id = Uuid::parse_str(user_id)
      .map_err(|_| ApiError::Unauthenticated(format!("malformed {USER_ID_HEADER}")))?;
    let email = header(parts, USER_EMAIL_HEADER)
      .ok_or_else(|| ApiError::Unauthenticated(format!("missing {USER_EMAIL_HEADER}")))?
      .to_owned();
    let display_name = header(parts, USER_NAME_HEADER).map(str::to_owned);

    Ok(CurrentUser(Identity { user_id, email, display_name }))
  }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
  parts
    .headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
}
