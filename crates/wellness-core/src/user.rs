//! Challenge participants.
//!
//! A user row is provisioned lazily the first time an authenticated identity
//! touches the service. `total_points` and `current_streak` are denormalised
//! aggregates over the user's daily logs and are only ever written by explicit
//! recalculation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tier::Tier;

/// Who is making a request, as asserted by the upstream auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id:      Uuid,
  pub email:        String,
  pub display_name: Option<String>,
}

impl Identity {
  /// The name shown on leaderboards: the supplied display name, or the local
  /// part of the email address.
  pub fn display_name_or_default(&self) -> String {
    match self.display_name.as_deref().map(str::trim) {
      Some(name) if !name.is_empty() => name.to_owned(),
      _ => self
        .email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_owned(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:        Uuid,
  pub email:          String,
  pub display_name:   String,
  pub total_points:   i64,
  pub current_streak: u32,
  pub team_id:        Option<Uuid>,
  pub created_at:     DateTime<Utc>,
}

impl User {
  /// A zero-valued record for `identity`, used both for provisioning and as
  /// the fallback when a profile read fails.
  pub fn fresh(identity: &Identity, created_at: DateTime<Utc>) -> Self {
    Self {
      user_id: identity.user_id,
      email: identity.email.clone(),
      display_name: identity.display_name_or_default(),
      total_points: 0,
      current_streak: 0,
      team_id: None,
      created_at,
    }
  }

  pub fn tier(&self) -> Tier { Tier::for_points(self.total_points) }
}

/// Read model returned to the participant about themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
  pub user:                User,
  pub tier:                Tier,
  pub next_tier:           Option<Tier>,
  /// `None` once the top tier is reached.
  pub points_to_next_tier: Option<i64>,
}

impl From<User> for UserSummary {
  fn from(user: User) -> Self {
    let tier = user.tier();
    let next_tier = tier.next();
    let points_to_next_tier = next_tier
      .map(|next| (next.threshold() - user.total_points).max(0));
    Self { user, tier, next_tier, points_to_next_tier }
  }
}
