//! Legacy storage path helpers.

use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

const DATABASE_FILENAME: &str = "RKStorage";
const STORAGE_DIRNAME: &str = "RCTAsyncLocalStorage_V1";
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Locations of the legacy `AsyncStorage` artifacts under an app's private
/// storage area.
///
/// `root` is resolved by the host application: the `databases` directory on
/// Android, the Application Support directory on iOS. On iOS the storage
/// directory is nested under the bundle identifier when one is given.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct LegacyStoragePaths {
    root: PathBuf,
    storage_dir: PathBuf,
}

impl LegacyStoragePaths {
    /// Builds legacy storage paths rooted at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, bundle_id: Option<&str>) -> Self {
        let root = root.as_ref().to_path_buf();
        let storage_dir = bundle_id
            .filter(|id| !id.is_empty())
            .map_or_else(|| root.clone(), |id| root.join(id))
            .join(STORAGE_DIRNAME);
        Self { root, storage_dir }
    }

    /// Returns the private storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the Android `RKStorage` database.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILENAME)
    }

    /// Returns the iOS `RCTAsyncLocalStorage_V1` directory.
    #[must_use]
    pub fn async_storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Returns the path to the iOS manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.storage_dir.join(MANIFEST_FILENAME)
    }

    /// Returns the path of the overflow file holding the value for `key`.
    #[must_use]
    pub fn shard_path(&self, key: &str) -> PathBuf {
        self.storage_dir.join(shard_file_name(key))
    }
}

#[uniffi::export]
impl LegacyStoragePaths {
    /// Builds legacy storage paths rooted at `root`.
    #[uniffi::constructor]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_root(root: String, bundle_id: Option<String>) -> Self {
        Self::new(PathBuf::from(root), bundle_id.as_deref())
    }

    /// Returns the private storage root as a string.
    #[must_use]
    pub fn root_path_string(&self) -> String {
        self.root.to_string_lossy().to_string()
    }

    /// Returns the path to the Android database as a string.
    #[must_use]
    pub fn database_path_string(&self) -> String {
        self.database_path().to_string_lossy().to_string()
    }

    /// Returns the iOS storage directory as a string.
    #[must_use]
    pub fn async_storage_dir_path_string(&self) -> String {
        self.storage_dir.to_string_lossy().to_string()
    }

    /// Returns the path to the iOS manifest as a string.
    #[must_use]
    pub fn manifest_path_string(&self) -> String {
        self.manifest_path().to_string_lossy().to_string()
    }
}

/// Name of the overflow file for `key`: the lowercase hex MD5 digest of its
/// UTF-8 bytes.
///
/// Only reproduces the legacy writer's naming; not a security boundary.
pub fn shard_file_name(key: &str) -> String {
    hex::encode(Md5::digest(key.as_bytes()))
}
