//! Storage bootstrap for the todo store.
//!
//! [`open_db`] and [`open_db_in_memory`] are the only ways the rest of the
//! workspace obtains a connection. Both hand back a connection whose schema
//! is at [`migrations::latest_version`], with the default categories seeded.
//!
//! Timestamps are produced by SQLite itself through [`NOW_EPOCH_MS_SQL`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// SQL expression producing the current time as Unix epoch milliseconds.
///
/// Timestamps are always generated inside SQLite so that ordering stays
/// consistent with the store clock, never the caller's.
pub const NOW_EPOCH_MS_SQL: &str = "(CAST(strftime('%s', 'now') AS INTEGER) * 1000 \
     + CAST(substr(strftime('%f', 'now'), 4) AS INTEGER))";

/// Failure to open or migrate the store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer schema.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A schema step failed; the open transaction was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "todo store schema version {db_version} is newer than supported \
                 {latest_supported}"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "todo store migration {version} ({name}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
