use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::{LegacyStorageError, LegacyStorageResult};

/// Platform family whose `AsyncStorage` convention should be read.
///
/// Identifiers follow React Native's `Platform.OS` values. `test` selects the
/// no-op backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, uniffi::Enum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    /// `SQLite` database in the app's `databases` directory.
    Android,
    /// Manifest directory in the app's Application Support directory.
    Ios,
    /// No legacy store; every lookup yields an empty string.
    Test,
}

impl Platform {
    /// Parses a platform identifier such as `"android"` or `"ios"`.
    ///
    /// # Errors
    ///
    /// Returns [`LegacyStorageError::UnsupportedPlatform`] for identifiers
    /// outside the three known families.
    pub fn from_identifier(identifier: &str) -> LegacyStorageResult<Self> {
        Self::from_str(identifier.trim())
            .map_err(|_| LegacyStorageError::UnsupportedPlatform(identifier.to_string()))
    }

    /// Returns the platform the crate was compiled for.
    ///
    /// Targets other than Android and iOS resolve to [`Platform::Test`].
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Test
        }
    }
}
