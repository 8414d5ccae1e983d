//! Error types for `wellness-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("activity {0} is not on today's board")]
  UnknownActivity(Uuid),

  #[error("activity {0} is already being saved")]
  SaveInFlight(Uuid),

  #[error("activity {0} is already logged for this day")]
  AlreadyLogged(Uuid),

  #[error("activity {0} is not logged for this day")]
  NotLogged(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Store error classification ──────────────────────────────────────────────

/// Coarse classification of a storage failure.
///
/// Callers branch on the kind instead of inspecting error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// Busy, locked or otherwise temporary; safe to retry.
  Transient,
  /// A uniqueness constraint rejected the write.
  Duplicate,
  /// A foreign key pointed at a row that does not exist.
  MissingReference,
  /// The row addressed by the operation does not exist.
  NotFound,
  /// The write violates a domain limit (e.g. a full team).
  Conflict,
  Other,
}

impl StoreErrorKind {
  pub fn is_transient(self) -> bool { matches!(self, Self::Transient) }
}

/// Implemented by every [`crate::store::WellnessStore`] error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}
