//! Error helpers for bidledger-store
//!
//! The store speaks `OpError`; raw `rusqlite::Error` never leaves this crate.

use bidledger_core::errors::{LedgerError, OpError, OpErrorKind};

/// Result type alias using OpError
pub type Result<T> = std::result::Result<T, OpError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> OpError {
    OpError::new(OpErrorKind::StorageFailure)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// An applied migration no longer matches the embedded SQL
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> OpError {
    OpError::new(OpErrorKind::StorageFailure)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> OpError {
    OpError::new(OpErrorKind::StorageFailure)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Same as [`from_rusqlite`] but for the core's error type, used where the
/// store implements core traits.
pub fn ledger_storage(err: rusqlite::Error) -> LedgerError {
    LedgerError::Storage {
        message: err.to_string(),
    }
}

/// A persisted snapshot could not be encoded or decoded
pub fn snapshot_codec(entity_id: &str, err: serde_json::Error) -> OpError {
    OpError::new(OpErrorKind::StorageFailure)
        .with_op("snapshot_codec")
        .with_entity_id(entity_id)
        .with_message(err.to_string())
}

/// A statement expected to touch exactly one row touched a different number
pub fn row_count(entity_id: &str, expected: usize, actual: usize) -> OpError {
    OpError::new(OpErrorKind::StorageFailure)
        .with_op("sqlite")
        .with_entity_id(entity_id)
        .with_message(format!("expected {} row(s) changed, got {}", expected, actual))
}

/// Convert a domain failure into the store's error type
pub fn from_ledger(err: LedgerError) -> OpError {
    err.into()
}
