use std::path::PathBuf;
use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum MatchError {
    /// A precondition failed before any I/O was attempted.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A save was rejected before touching the store.
    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("Failed to read {operation}: {source}")]
    StoreReadFailed {
        operation: &'static str,
        #[source]
        source: DatabaseError,
    },

    #[error("Failed to write {operation}: {source}")]
    StoreWriteFailed {
        operation: &'static str,
        #[source]
        source: DatabaseError,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Preferences error: {0}")]
    Prefs(#[from] PrefsError),
}

impl MatchError {
    /// Wraps a read failure, logging it once at the boundary.
    pub(crate) fn read(operation: &'static str) -> impl FnOnce(DatabaseError) -> Self {
        move |source| {
            log::error!("Failed to read {}: {}", operation, source);
            MatchError::StoreReadFailed { operation, source }
        }
    }

    /// Wraps a write failure, logging it once at the boundary.
    pub(crate) fn write(operation: &'static str) -> impl FnOnce(DatabaseError) -> Self {
        move |source| {
            log::error!("Failed to write {}: {}", operation, source);
            MatchError::StoreWriteFailed { operation, source }
        }
    }

    /// True for errors raised before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MatchError::ValidationFailed(_) | MatchError::SaveFailed(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Failed to read preferences '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write preferences '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed value for key '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Preset name must not be empty")]
    EmptyPresetName,

    #[error("Preference store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, MatchError>;
