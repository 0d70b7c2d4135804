//! Error types for legacy storage access.

use thiserror::Error;

/// Result type for legacy storage operations.
pub type LegacyStorageResult<T> = Result<T, LegacyStorageError>;

/// Errors raised while locating, reading or clearing the legacy store.
///
/// A store that was never written is not an error: readers report it through
/// `exists() == false` and `data(..) == None`.
#[derive(Debug, Error, uniffi::Error)]
pub enum LegacyStorageError {
    /// The platform identifier has no legacy storage convention.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Errors coming from the legacy `SQLite` database.
    #[error("database error: {0}")]
    Database(String),

    /// Filesystem read or delete failures.
    #[error("io error: {0}")]
    Io(String),

    /// The iOS manifest could not be parsed or holds unexpected values.
    #[error("corrupt manifest: {0}")]
    CorruptManifest(String),

    /// A database lookup did not match exactly one row.
    #[error("expected exactly one row for key {key:?}, found {rows}")]
    LookupCardinality {
        /// Key that was looked up.
        key: String,
        /// Number of rows the lookup matched.
        rows: u64,
    },

    /// A blocking storage task did not run to completion.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl From<rusqlite::Error> for LegacyStorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<std::io::Error> for LegacyStorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LegacyStorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::CorruptManifest(err.to_string())
    }
}

impl From<tokio::task::JoinError> for LegacyStorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Runtime(err.to_string())
    }
}
