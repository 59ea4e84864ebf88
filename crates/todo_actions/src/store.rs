//! Process-wide store handle.
//!
//! # Responsibility
//! - Open the SQLite connection lazily on first use.
//! - Serialize access to the single connection.
//! - Offer an explicit `open`/`close` lifecycle.
//!
//! # Invariants
//! - At most one connection is open per handle.
//! - After `close`, the next access reopens the database.

use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use todo_core::db::{open_db, open_db_in_memory, DbError, DbResult};
use todo_core::{ErrorKind, RepoError};

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Volatile database; closing the handle discards all data.
    Memory,
}

impl StoreLocation {
    fn open(&self) -> DbResult<Connection> {
        match self {
            Self::File(path) => open_db(path),
            Self::Memory => open_db_in_memory(),
        }
    }
}

/// Failure reaching the store or running an operation on it.
#[derive(Debug)]
pub enum StoreError {
    /// The database could not be opened or migrated.
    Unavailable(DbError),
    /// A previous caller panicked while holding the connection.
    Poisoned,
    /// The operation itself failed.
    Repo(RepoError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Repo(err) => err.kind(),
            Self::Unavailable(_) | Self::Poisoned => ErrorKind::Storage,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "store unavailable: {err}"),
            Self::Poisoned => write!(f, "store connection lock poisoned"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            Self::Poisoned => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Lazily-opened, mutex-guarded SQLite connection.
pub struct SharedStore {
    location: StoreLocation,
    conn: Mutex<Option<Connection>>,
}

impl SharedStore {
    /// Creates a handle without touching the database.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: Mutex::new(None),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Opens the connection now instead of on first use. Idempotent.
    pub fn open(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        self.ensure_open(&mut guard)?;
        Ok(())
    }

    /// Drops the open connection, if any.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.take().is_some() {
            info!("event=store_close module=actions status=ok");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Runs `f` against the connection, opening it first when needed.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, RepoError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let conn = self.ensure_open(&mut guard)?;
        Ok(f(conn)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, StoreError> {
        self.conn.lock().map_err(|_| {
            error!("event=store_lock module=actions status=error error_code=poisoned");
            StoreError::Poisoned
        })
    }

    fn ensure_open<'g>(
        &self,
        slot: &'g mut Option<Connection>,
    ) -> Result<&'g Connection, StoreError> {
        if slot.is_none() {
            let conn = self.location.open().map_err(StoreError::Unavailable)?;
            *slot = Some(conn);
        }
        slot.as_ref().ok_or(StoreError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::{SharedStore, StoreError, StoreLocation};

    #[test]
    fn store_opens_lazily_and_reopens_after_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lazy.db");
        let store = SharedStore::new(StoreLocation::File(path.clone()));

        assert!(!store.is_open());
        assert!(!path.exists());

        let version: u32 = store
            .with_connection(|conn| Ok(conn.query_row("PRAGMA user_version;", [], |r| r.get(0))?))
            .unwrap();
        assert!(version > 0);
        assert!(store.is_open());

        store.close().unwrap();
        assert!(!store.is_open());
        store.open().unwrap();
        assert!(store.is_open());
    }

    #[test]
    fn unreachable_path_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("todo.db");
        let store = SharedStore::new(StoreLocation::File(path));

        assert!(matches!(store.open(), Err(StoreError::Unavailable(_))));
        assert!(!store.is_open());
    }
}
