//! iOS `AsyncStorage` layout: a manifest plus MD5-named overflow files.
//!
//! The legacy writer inlines small values into `manifest.json` and stores
//! large ones in a file named after the MD5 digest of the key, leaving `null`
//! in the manifest. Lookups check the manifest first and only then the
//! overflow file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::{Map, Value};

use crate::error::{LegacyStorageError, LegacyStorageResult};
use crate::paths::{shard_file_name, MANIFEST_FILENAME};
use crate::reader::LegacyReader;

/// Reader for the `RCTAsyncLocalStorage_V1` directory.
///
/// Holds no open handles; every call reads from disk.
#[derive(Debug, Clone)]
pub struct FileSystemReader {
    dir: PathBuf,
}

impl FileSystemReader {
    /// Creates a reader over the storage directory at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILENAME)
    }

    fn load_manifest(&self) -> LegacyStorageResult<Option<Map<String, Value>>> {
        let Some(raw) = read_if_exists(&self.manifest_path())? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(LegacyStorageError::CorruptManifest(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }

    fn manifest_value(&self, key: &str) -> LegacyStorageResult<Option<String>> {
        let Some(mut manifest) = self.load_manifest()? else {
            return Ok(None);
        };
        match manifest.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(LegacyStorageError::CorruptManifest(format!(
                "value for key {key:?} is a {}",
                json_type(&other)
            ))),
        }
    }

    fn shard_value(&self, key: &str) -> LegacyStorageResult<Option<String>> {
        read_if_exists(&self.dir.join(shard_file_name(key)))
    }
}

impl LegacyReader for FileSystemReader {
    fn exists(&self) -> LegacyStorageResult<bool> {
        Ok(self.manifest_path().try_exists()?)
    }

    fn data(&self, key: &str) -> LegacyStorageResult<Option<String>> {
        if let Some(value) = self.manifest_value(key)? {
            return Ok(Some(value));
        }
        let value = self.shard_value(key)?;
        if value.is_some() {
            debug!("legacy value for key resolved from overflow file");
        }
        Ok(value)
    }

    fn clear(&self) -> LegacyStorageResult<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                debug!("removed legacy storage directory");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads `path` to a string, mapping a missing file to `None`.
fn read_if_exists(path: &Path) -> LegacyStorageResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
