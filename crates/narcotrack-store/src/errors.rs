//! Error handling for narcotrack-store
//!
//! Wraps narcotrack-core TrackerError with store-specific helpers

use narcotrack_core::errors::{TrackerError, TrackerErrorKind};

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> TrackerError {
    TrackerError::new(TrackerErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> TrackerError {
    TrackerError::new(TrackerErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a seed validation error
pub fn seed_validation(reason: &str) -> TrackerError {
    TrackerError::new(TrackerErrorKind::InvalidInput)
        .with_op("seed_parse")
        .with_message(reason.to_string())
}

/// Create an error for a command whose `execute` already ran
pub fn invalid_command_state(op: &'static str) -> TrackerError {
    TrackerError::new(TrackerErrorKind::InvalidCommandState)
        .with_op(op)
        .with_message("command has already been executed")
}

/// Create a database error from rusqlite::Error
///
/// Classifies driver failures onto the taxonomy: constraint failures,
/// unopenable or corrupt database files, and missing rows each get their
/// own kind so callers can match on the code.
pub fn from_rusqlite(err: rusqlite::Error) -> TrackerError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            rusqlite::ErrorCode::ConstraintViolation => TrackerErrorKind::ConstraintViolation,
            rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::NotADatabase => {
                TrackerErrorKind::StoreUnavailable
            }
            _ => TrackerErrorKind::Persistence,
        },
        rusqlite::Error::QueryReturnedNoRows => TrackerErrorKind::NotFound,
        _ => TrackerErrorKind::Persistence,
    };

    TrackerError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}
