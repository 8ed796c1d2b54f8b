//! Core error types for focusdeck-core.
//!
//! Validation failures are recoverable and meant to be shown to the user.
//! Storage failures bubble up from the key-value backend; readers usually
//! swallow them and fall back to defaults (see [`crate::storage::Storage`]).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Key-value backend errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Storage is locked")]
    Locked,

    /// A record could not be serialized for writing
    #[error("Failed to serialize record '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors on user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration must be a positive whole number of seconds
    #[error("Invalid {phase} duration '{input}': must be a positive whole number of seconds")]
    InvalidDuration { phase: String, input: String },

    /// Date string is not a calendar date in YYYY-MM-DD form
    #[error("Malformed date '{0}': expected YYYY-MM-DD")]
    MalformedDate(String),

    /// Habit completions cannot be recorded ahead of today
    #[error("Cannot mark {date} complete: it is after today ({today})")]
    FutureDate { date: String, today: String },

    /// Task due dates cannot be in the past
    #[error("Due date {date} must be today ({today}) or later")]
    PastDueDate { date: String, today: String },

    /// Length constraints on free text fields
    #[error("{field} must be between {min} and {max} characters (got {len})")]
    Length {
        field: String,
        min: usize,
        max: usize,
        len: usize,
    },

    /// No record with the given identifier
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: String, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
