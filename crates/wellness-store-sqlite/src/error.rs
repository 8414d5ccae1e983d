//! Error type for `wellness-store-sqlite`.

use rusqlite::{ErrorCode, ffi};
use thiserror::Error;
use wellness_core::{StoreError, StoreErrorKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unexpected column value: {0}")]
  Decode(String),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  #[error("team not found: {0}")]
  TeamNotFound(uuid::Uuid),

  #[error("user is already on team {0}")]
  AlreadyOnTeam(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Error::Database(e) => classify(e),
      Error::UserNotFound(_) | Error::TeamNotFound(_) => StoreErrorKind::NotFound,
      Error::AlreadyOnTeam(_) => StoreErrorKind::Conflict,
      Error::Uuid(_) | Error::DateParse(_) | Error::Decode(_) => {
        StoreErrorKind::Other
      }
    }
  }
}

/// Map SQLite result codes onto store error kinds.
fn classify(err: &tokio_rusqlite::Error) -> StoreErrorKind {
  let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _)) =
    err
  else {
    return StoreErrorKind::Other;
  };

  match failure.code {
    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => StoreErrorKind::Transient,
    ErrorCode::ConstraintViolation => match failure.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
        StoreErrorKind::Duplicate
      }
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreErrorKind::MissingReference,
      _ => StoreErrorKind::Conflict,
    },
    _ => StoreErrorKind::Other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sqlite_failure(code: i32) -> Error {
    Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(ffi::Error::new(code), None),
    ))
  }

  #[test]
  fn classifies_constraint_violations() {
    assert_eq!(
      sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE).kind(),
      StoreErrorKind::Duplicate
    );
    assert_eq!(
      sqlite_failure(ffi::SQLITE_CONSTRAINT_FOREIGNKEY).kind(),
      StoreErrorKind::MissingReference
    );
    assert_eq!(
      sqlite_failure(ffi::SQLITE_CONSTRAINT_CHECK).kind(),
      StoreErrorKind::Conflict
    );
  }

  #[test]
  fn busy_and_locked_are_transient() {
    assert!(sqlite_failure(ffi::SQLITE_BUSY).kind().is_transient());
    assert!(sqlite_failure(ffi::SQLITE_LOCKED).kind().is_transient());
  }

  #[test]
  fn domain_errors_have_fixed_kinds() {
    let id = uuid::Uuid::nil();
    assert_eq!(Error::UserNotFound(id).kind(), StoreErrorKind::NotFound);
    assert_eq!(Error::AlreadyOnTeam(id).kind(), StoreErrorKind::Conflict);
  }
}
