use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The directory holding the matchdesk database could not be created.
    #[error("Cannot create database directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema migration v{version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// A count or offset does not fit SQLite's signed 64-bit integers.
    #[error("{name} {value} exceeds the SQLite integer range")]
    OutOfRange { name: &'static str, value: u64 },

    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Converts a row count for binding as an SQLite integer.
    pub(crate) fn sql_int(name: &'static str, value: u64) -> Result<i64, DatabaseError> {
        i64::try_from(value).map_err(|_| DatabaseError::OutOfRange { name, value })
    }
}
