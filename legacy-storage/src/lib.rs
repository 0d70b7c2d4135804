//! Read-only access to data persisted by React Native's `AsyncStorage`.
//!
//! Apps migrating away from React Native still have user data sitting in the
//! old store. This crate locates that store, reads raw string values by key
//! and can wipe it once migration is done. Nothing is ever written back.
//!
//! Two on-disk layouts are understood:
//!
//! * **Android**: a `SQLite` database named `RKStorage` holding the
//!   `catalystLocalStorage` table.
//! * **iOS**: an `RCTAsyncLocalStorage_V1` directory with a `manifest.json`
//!   for small values and MD5-named overflow files for large ones.
//!
//! A third, no-op backend is selected for test builds so host apps can run
//! their migration flow without a real legacy store.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use legacy_storage::{LegacyStorage, LegacyStoragePaths};
//!
//! # async fn run() -> Result<(), legacy_storage::LegacyStorageError> {
//! let paths = Arc::new(LegacyStoragePaths::new("/data/data/com.example/databases", None));
//! let storage = LegacyStorage::new("android".to_string(), paths)?;
//! if storage.exists().await? {
//!     let token = storage.data("auth_token".to_string()).await?;
//!     println!("{token:?}");
//!     storage.clear().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::*;

mod platform;
pub use platform::Platform;

mod paths;
pub use paths::LegacyStoragePaths;

mod reader;
pub use reader::LegacyReader;

mod filesystem;
pub use filesystem::FileSystemReader;

mod null;
pub use null::NullReader;

mod sqlite;
pub use sqlite::SqliteReader;

mod storage;
pub use storage::{LegacyEntry, LegacyStorage};

pub mod logger;

uniffi::setup_scaffolding!("legacy_storage");
