//! Android `AsyncStorage` layout: the `RKStorage` `SQLite` database.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use rusqlite::{params, Connection, OpenFlags};

use crate::error::{LegacyStorageError, LegacyStorageResult};
use crate::reader::LegacyReader;

const SELECT_VALUE_SQL: &str = "SELECT value FROM catalystLocalStorage WHERE key = ?1";

/// Journal files `SQLite` may leave next to the database.
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Reader for the legacy `RKStorage` database.
///
/// The database is opened lazily, read-only, on the first `data` or `clear`
/// call, and the handle is reused until `clear` or `dispose` releases it.
/// Calls on one instance are serialized by an internal lock.
pub struct SqliteReader {
    path: PathBuf,
    state: Mutex<ReaderState>,
}

enum ReaderState {
    Uninitialized,
    /// No database existed when the reader initialized.
    Missing,
    Open(Connection),
}

impl std::fmt::Debug for SqliteReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteReader")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteReader {
    /// Creates a reader for the database at `path`. Nothing is opened yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(ReaderState::Uninitialized),
        }
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> LegacyStorageResult<MutexGuard<'_, ReaderState>> {
        self.state
            .lock()
            .map_err(|_| LegacyStorageError::Database("reader mutex poisoned".to_string()))
    }

    /// Moves an uninitialized reader to `Open` or `Missing`.
    fn ensure_initialized(&self, state: &mut ReaderState) -> LegacyStorageResult<()> {
        if !matches!(state, ReaderState::Uninitialized) {
            return Ok(());
        }
        *state = if self.path.try_exists()? {
            debug!("opening legacy database read-only");
            ReaderState::Open(open_read_only(&self.path)?)
        } else {
            debug!("no legacy database present");
            ReaderState::Missing
        };
        Ok(())
    }

    fn delete_database_files(&self) -> LegacyStorageResult<()> {
        remove_if_exists(&self.path)?;
        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = self.path.clone().into_os_string();
            sidecar.push(suffix);
            remove_if_exists(Path::new(&sidecar))?;
        }
        Ok(())
    }
}

impl LegacyReader for SqliteReader {
    fn exists(&self) -> LegacyStorageResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn data(&self, key: &str) -> LegacyStorageResult<Option<String>> {
        let mut state = self.lock()?;
        self.ensure_initialized(&mut state)?;
        match &*state {
            ReaderState::Open(conn) => lookup(conn, key).map(Some),
            ReaderState::Missing | ReaderState::Uninitialized => Ok(None),
        }
    }

    fn clear(&self) -> LegacyStorageResult<()> {
        let mut state = self.lock()?;
        self.ensure_initialized(&mut state)?;
        match std::mem::replace(&mut *state, ReaderState::Uninitialized) {
            ReaderState::Open(conn) => {
                close(conn)?;
                self.delete_database_files()?;
                debug!("deleted legacy database");
                Ok(())
            }
            ReaderState::Missing | ReaderState::Uninitialized => Ok(()),
        }
    }

    fn dispose(&self) -> LegacyStorageResult<()> {
        let mut state = self.lock()?;
        match std::mem::replace(&mut *state, ReaderState::Uninitialized) {
            ReaderState::Open(conn) => close(conn),
            ReaderState::Missing | ReaderState::Uninitialized => Ok(()),
        }
    }
}

/// Opens the database without write access so the legacy schema upgrade path
/// can never run.
fn open_read_only(path: &Path) -> LegacyStorageResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    Ok(Connection::open_with_flags(path, flags)?)
}

fn close(conn: Connection) -> LegacyStorageResult<()> {
    conn.close().map_err(|(_, err)| err.into())
}

/// Runs the point lookup for `key`, requiring exactly one matching row.
fn lookup(conn: &Connection, key: &str) -> LegacyStorageResult<String> {
    let mut stmt = conn.prepare_cached(SELECT_VALUE_SQL)?;
    let mut rows = stmt.query(params![key])?;
    let mut found: Option<String> = None;
    let mut count: u64 = 0;
    while let Some(row) = rows.next()? {
        count += 1;
        if found.is_none() {
            found = Some(row.get(0)?);
        }
    }
    match (found, count) {
        (Some(value), 1) => Ok(value),
        (_, count) => {
            warn!("legacy database lookup matched {count} rows");
            Err(LegacyStorageError::LookupCardinality {
                key: key.to_string(),
                rows: count,
            })
        }
    }
}

/// Deletes the file at `path` if it exists.
fn remove_if_exists(path: &Path) -> LegacyStorageResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
