use crate::error::LegacyStorageResult;
use crate::reader::LegacyReader;

/// Stand-in backend for platforms without a legacy store.
///
/// Always reports a store, answers every key with an empty string and treats
/// `clear` as a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReader;

impl LegacyReader for NullReader {
    fn exists(&self) -> LegacyStorageResult<bool> {
        Ok(true)
    }

    fn data(&self, _key: &str) -> LegacyStorageResult<Option<String>> {
        Ok(Some(String::new()))
    }

    fn clear(&self) -> LegacyStorageResult<()> {
        Ok(())
    }
}
