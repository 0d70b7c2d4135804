//! Platform-selected facade over the legacy readers.

use std::sync::Arc;

use log::debug;

use crate::error::LegacyStorageResult;
use crate::filesystem::FileSystemReader;
use crate::null::NullReader;
use crate::paths::LegacyStoragePaths;
use crate::platform::Platform;
use crate::reader::LegacyReader;
use crate::sqlite::SqliteReader;

/// Legacy `AsyncStorage` bound to one platform convention.
///
/// The backend is chosen once at construction. Every I/O operation runs the
/// blocking backend call on the Tokio blocking pool.
#[derive(uniffi::Object)]
pub struct LegacyStorage {
    platform: Platform,
    reader: Arc<dyn LegacyReader>,
}

impl std::fmt::Debug for LegacyStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyStorage")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl LegacyStorage {
    /// Builds the backend documented for `platform`:
    ///
    /// * Android: `SQLite` reader over `paths.database_path()`
    /// * iOS: manifest reader over `paths.async_storage_dir()`
    /// * Test: [`NullReader`]
    ///
    /// Nothing is opened or created on disk.
    #[must_use]
    pub fn for_platform(platform: Platform, paths: &LegacyStoragePaths) -> Self {
        let reader: Arc<dyn LegacyReader> = match platform {
            Platform::Android => Arc::new(SqliteReader::new(paths.database_path())),
            Platform::Ios => Arc::new(FileSystemReader::new(paths.async_storage_dir())),
            Platform::Test => Arc::new(NullReader),
        };
        debug!("legacy storage bound to {platform} backend");
        Self { platform, reader }
    }

    /// Wraps a custom reader.
    #[must_use]
    pub const fn with_reader(platform: Platform, reader: Arc<dyn LegacyReader>) -> Self {
        Self { platform, reader }
    }

    async fn run<T, F>(&self, op: F) -> LegacyStorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn LegacyReader) -> LegacyStorageResult<T> + Send + 'static,
    {
        let reader = Arc::clone(&self.reader);
        tokio::task::spawn_blocking(move || op(reader.as_ref())).await?
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl LegacyStorage {
    /// Creates the legacy storage for a platform identifier (`"android"`,
    /// `"ios"` or `"test"`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::LegacyStorageError::UnsupportedPlatform`] for any
    /// other identifier.
    #[uniffi::constructor]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(
        platform_id: String,
        paths: Arc<LegacyStoragePaths>,
    ) -> LegacyStorageResult<Self> {
        let platform = Platform::from_identifier(&platform_id)?;
        Ok(Self::for_platform(platform, &paths))
    }

    /// Creates the legacy storage for the platform this library was built for.
    #[uniffi::constructor]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn for_current_platform(paths: Arc<LegacyStoragePaths>) -> Self {
        Self::for_platform(Platform::current(), &paths)
    }

    /// Returns the platform whose backend is in use.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns whether the legacy store is present on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if presence cannot be determined.
    pub async fn exists(&self) -> LegacyStorageResult<bool> {
        self.run(|reader| reader.exists()).await
    }

    /// Reads the raw value stored under `key`, or `None` when there is no
    /// legacy store.
    ///
    /// On Android the key must exist in the database; a missing key is a
    /// [`crate::LegacyStorageError::LookupCardinality`] error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreadable or corrupt.
    pub async fn data(&self, key: String) -> LegacyStorageResult<Option<String>> {
        self.run(move |reader| reader.data(&key)).await
    }

    /// Deletes all legacy data. Succeeds when nothing is left to delete.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion is not permitted or the medium is busy.
    pub async fn clear(&self) -> LegacyStorageResult<()> {
        self.run(|reader| reader.clear()).await
    }

    /// Releases open handles without deleting data. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle cannot be closed cleanly.
    pub async fn dispose(&self) -> LegacyStorageResult<()> {
        self.run(|reader| reader.dispose()).await
    }

    /// Binds `key` for repeated lookups.
    #[must_use]
    pub fn entry(self: Arc<Self>, key: String) -> Arc<LegacyEntry> {
        Arc::new(LegacyEntry { storage: self, key })
    }
}

/// A single legacy value, bound to its key at construction.
#[derive(Debug, uniffi::Object)]
pub struct LegacyEntry {
    storage: Arc<LegacyStorage>,
    key: String,
}

#[uniffi::export(async_runtime = "tokio")]
impl LegacyEntry {
    /// Returns the bound key.
    #[must_use]
    pub fn key(&self) -> String {
        self.key.clone()
    }

    /// Returns whether the underlying legacy store is present.
    ///
    /// # Errors
    ///
    /// Returns an error if presence cannot be determined.
    pub async fn exists(&self) -> LegacyStorageResult<bool> {
        self.storage.exists().await
    }

    /// Reads the bound value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreadable or corrupt.
    pub async fn data(&self) -> LegacyStorageResult<Option<String>> {
        self.storage.data(self.key.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rusqlite::{params, Connection};

    use super::*;
    use crate::error::LegacyStorageError;
    use crate::paths::shard_file_name;

    fn seed_android(paths: &LegacyStoragePaths, rows: &[(&str, &str)]) {
        let conn = Connection::open(paths.database_path()).expect("create legacy db");
        conn.execute_batch(
            "CREATE TABLE catalystLocalStorage (key TEXT PRIMARY KEY, value TEXT NOT NULL);",
        )
        .expect("create table");
        for (key, value) in rows {
            conn.execute(
                "INSERT INTO catalystLocalStorage (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .expect("insert row");
        }
    }

    fn seed_ios(paths: &LegacyStoragePaths, manifest: &str, shards: &[(&str, &str)]) {
        let dir = paths.async_storage_dir();
        fs::create_dir_all(dir).expect("create storage dir");
        fs::write(paths.manifest_path(), manifest).expect("write manifest");
        for (key, value) in shards {
            fs::write(dir.join(shard_file_name(key)), value).expect("write shard");
        }
    }

    #[test]
    fn test_unsupported_platform() {
        let paths = Arc::new(LegacyStoragePaths::new("/tmp/legacy-storage", None));
        let err = LegacyStorage::new("web".to_string(), paths).expect_err("web");
        assert!(matches!(err, LegacyStorageError::UnsupportedPlatform(id) if id == "web"));
    }

    #[test]
    fn test_construction_touches_nothing() {
        let root = tempfile::tempdir().unwrap();
        let paths = Arc::new(LegacyStoragePaths::new(root.path(), Some("com.example")));
        for id in ["android", "ios", "test"] {
            LegacyStorage::new(id.to_string(), Arc::clone(&paths)).unwrap();
        }
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_current_platform_factory() {
        let paths = Arc::new(LegacyStoragePaths::new("/tmp/legacy-storage", None));
        let storage = LegacyStorage::for_current_platform(paths);
        assert_eq!(storage.platform(), Platform::current());
    }

    #[tokio::test]
    async fn test_android_backend() {
        let root = tempfile::tempdir().unwrap();
        let paths = Arc::new(LegacyStoragePaths::new(root.path(), None));
        seed_android(&paths, &[("session", "abc")]);

        let storage = LegacyStorage::new("android".to_string(), Arc::clone(&paths)).unwrap();
        assert_eq!(storage.platform(), Platform::Android);
        assert!(storage.exists().await.unwrap());
        assert_eq!(
            storage.data("session".to_string()).await.unwrap().as_deref(),
            Some("abc")
        );

        storage.clear().await.unwrap();
        assert!(!storage.exists().await.unwrap());
        assert!(!paths.database_path().exists());
        assert_eq!(storage.data("session".to_string()).await.unwrap(), None);
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_ios_backend() {
        let root = tempfile::tempdir().unwrap();
        let paths = Arc::new(LegacyStoragePaths::new(root.path(), Some("com.example")));
        seed_ios(&paths, r#"{"session":"abc","blob":null}"#, &[("blob", "large")]);

        let storage = LegacyStorage::new("ios".to_string(), Arc::clone(&paths)).unwrap();
        assert_eq!(storage.platform(), Platform::Ios);
        assert!(storage.exists().await.unwrap());
        assert_eq!(
            storage.data("session".to_string()).await.unwrap().as_deref(),
            Some("abc")
        );
        assert_eq!(
            storage.data("blob".to_string()).await.unwrap().as_deref(),
            Some("large")
        );
        assert_eq!(storage.data("nope".to_string()).await.unwrap(), None);

        storage.clear().await.unwrap();
        assert!(!storage.exists().await.unwrap());
        assert!(!paths.async_storage_dir().exists());
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_test_backend() {
        let paths = Arc::new(LegacyStoragePaths::new("/nonexistent/legacy", None));
        let storage = LegacyStorage::new("test".to_string(), paths).unwrap();

        assert_eq!(storage.platform(), Platform::Test);
        assert!(storage.exists().await.unwrap());
        assert_eq!(
            storage.data("anything".to_string()).await.unwrap().as_deref(),
            Some("")
        );
        storage.clear().await.unwrap();
        storage.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn test_entry_reads_bound_key() {
        let root = tempfile::tempdir().unwrap();
        let paths = Arc::new(LegacyStoragePaths::new(root.path(), None));
        seed_ios(&paths, r#"{"theme":"dark"}"#, &[]);

        let storage = Arc::new(LegacyStorage::new("ios".to_string(), paths).unwrap());
        let entry = Arc::clone(&storage).entry("theme".to_string());

        assert_eq!(entry.key(), "theme");
        assert!(entry.exists().await.unwrap());
        assert_eq!(entry.data().await.unwrap().as_deref(), Some("dark"));

        storage.clear().await.unwrap();
        assert_eq!(entry.data().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dispose_keeps_android_data() {
        let root = tempfile::tempdir().unwrap();
        let paths = Arc::new(LegacyStoragePaths::new(root.path(), None));
        seed_android(&paths, &[("theme", "dark")]);

        let storage = LegacyStorage::new("android".to_string(), Arc::clone(&paths)).unwrap();
        storage.data("theme".to_string()).await.unwrap();
        storage.dispose().await.unwrap();
        storage.dispose().await.unwrap();

        assert!(paths.database_path().exists());
        assert_eq!(
            storage.data("theme".to_string()).await.unwrap().as_deref(),
            Some("dark")
        );
    }
}
