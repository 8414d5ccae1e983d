//! Administrators and application settings.
//!
//! Admin rights come from two sources, consulted in order: a seed set fixed at
//! startup (compiled-in defaults plus configured emails) and the persisted
//! `admin_users` table. [`AdminSeed`] is the first source; the service layer
//! combines it with the store.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emails granted admin rights in every deployment.
pub const BOOTSTRAP_ADMINS: &[&str] = &["wellness-admin@localhost"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
  pub email:    String,
  pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSetting {
  pub key:        String,
  pub value:      String,
  pub updated_at: DateTime<Utc>,
}

/// Which source granted admin rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminSource {
  Seed,
  Persisted,
}

/// Canonical form used for every admin comparison and for storage.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// The immutable, startup-time half of the admin policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
  emails: BTreeSet<String>,
}

impl AdminSeed {
  /// The bootstrap list extended with `extra` emails.
  pub fn with_bootstrap<I, S>(extra: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let emails = BOOTSTRAP_ADMINS
      .iter()
      .map(|e| normalize_email(e))
      .chain(extra.into_iter().map(|e| normalize_email(e.as_ref())))
      .filter(|e| !e.is_empty())
      .collect();
    Self { emails }
  }

  pub fn contains(&self, email: &str) -> bool {
    self.emails.contains(&normalize_email(email))
  }

  pub fn emails(&self) -> impl Iterator<Item = &str> {
    self.emails.iter().map(String::as_str)
  }
}

impl Default for AdminSeed {
  fn default() -> Self { Self::with_bootstrap(std::iter::empty::<&str>()) }
}
