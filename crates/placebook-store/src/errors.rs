//! Error helpers for placebook-store
//!
//! Every infrastructure failure becomes `OperationFailed`; the original
//! message is kept as internal detail.

use placebook_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::operation_failed(
        "migration",
        format!("Migration {} failed: {}", migration_id, reason),
    )
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::operation_failed(
        "migration_checksum",
        format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    )
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::operation_failed("sqlite", err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::operation_failed(operation, err.to_string())
}

/// Asset path is missing from the store
pub fn asset_missing(path: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("asset_remove")
        .with_entity_id(path)
        .with_message("Asset not found")
}

/// Asset path escapes the store root or is otherwise unusable
pub fn asset_path_rejected(path: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("asset_path")
        .with_entity_id(path)
        .with_message(reason.to_string())
}
