//! Error type for `wellness-service`.
//!
//! Display strings are shown to participants verbatim, so they avoid
//! internal detail. The underlying store error is kept as the source.

use thiserror::Error;
use uuid::Uuid;
use wellness_core::{StoreError, StoreErrorKind};

use crate::retry::RetryError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("admin rights are required for this action")]
  Unauthorized,

  /// The user row was not visible yet when a log referenced it.
  #[error("your profile is being set up, please refresh")]
  ProfileSettingUp,

  #[error("{0} not found")]
  NotFound(String),

  #[error("team {0} is full")]
  TeamFull(Uuid),

  #[error("you are already on team {0}")]
  AlreadyOnTeam(Uuid),

  #[error("{0}")]
  InvalidInput(String),

  #[error(transparent)]
  Board(#[from] wellness_core::Error),

  #[error("could not save after {attempts} attempts, please try again")]
  RetriesExhausted { attempts: u32, last_error: String },

  #[error("something went wrong while saving, please try again")]
  Store {
    kind:   StoreErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Wrap a backend error, remembering its kind.
  pub fn store<E: StoreError>(err: E) -> Self {
    Self::Store { kind: err.kind(), source: Box::new(err) }
  }

  /// The store error kind, if this error came from the backend.
  /// Exhausted retries count as transient.
  pub fn store_kind(&self) -> Option<StoreErrorKind> {
    match self {
      Self::Store { kind, .. } => Some(*kind),
      Self::RetriesExhausted { .. } => Some(StoreErrorKind::Transient),
      _ => None,
    }
  }
}

impl<E: StoreError> From<RetryError<E>> for Error {
  fn from(err: RetryError<E>) -> Self {
    match err {
      RetryError::Permanent(e) => Self::store(e),
      RetryError::Exhausted { attempts, last_error } => Self::RetriesExhausted {
        attempts,
        last_error: last_error.to_string(),
      },
    }
  }
}
