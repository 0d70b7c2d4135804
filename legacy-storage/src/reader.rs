use crate::error::LegacyStorageResult;

/// Read-only capability shared by every legacy storage backend.
///
/// Implementations perform blocking I/O; [`crate::LegacyStorage`] moves the
/// calls onto the blocking pool for async callers.
pub trait LegacyReader: Send + Sync {
    /// Returns whether the legacy store is present on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if presence cannot be determined (e.g. permission
    /// denied on a parent directory).
    fn exists(&self) -> LegacyStorageResult<bool>;

    /// Reads the raw string value stored under `key`.
    ///
    /// Returns `Ok(None)` when the store or the value does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreadable or corrupt.
    fn data(&self, key: &str) -> LegacyStorageResult<Option<String>>;

    /// Deletes the whole legacy store. Clearing a store that is already gone
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion is not permitted or the medium is busy.
    fn clear(&self) -> LegacyStorageResult<()>;

    /// Releases any open handle without touching the data.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle cannot be closed cleanly.
    fn dispose(&self) -> LegacyStorageResult<()> {
        Ok(())
    }
}
