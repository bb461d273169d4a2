//! Core error types for timeblock-core.
//!
//! State machines never surface sink failures to their callers; these types
//! are returned by the port traits and by the configuration/storage layers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeblock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schedule validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Audio sink errors
    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),

    /// Notification sink errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the key-value persistence collaborator.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Store cannot be reached at all (e.g. no data directory)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Schedule validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Hour or minute outside 0-23 / 0-59
    #[error("Block '{id}' has an invalid {field}: {value}")]
    InvalidClockField {
        id: String,
        field: &'static str,
        value: u32,
    },

    /// Block id is empty
    #[error("Block at index {index} has an empty id")]
    EmptyId { index: usize },

    /// Two blocks share an id
    #[error("Duplicate block id '{0}'")]
    DuplicateId(String),

    /// Start and end are the same clock time
    #[error("Block '{0}' has zero length")]
    ZeroLength(String),

    /// Two blocks cover the same minute
    #[error("Blocks '{first}' and '{second}' overlap")]
    Overlap { first: String, second: String },

    /// More than one block crosses midnight
    #[error("Only one overnight block is allowed, found '{first}' and '{second}'")]
    MultipleOvernight { first: String, second: String },

    /// Unparseable clock string
    #[error("Invalid clock time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidClockTime(String),
}

/// Audio sink errors.
#[derive(Error, Debug)]
pub enum SoundError {
    /// Platform has no audio output
    #[error("Audio output unsupported: {0}")]
    Unsupported(String),

    /// Sink refused to schedule or stop a voice
    #[error("Audio sink failure: {0}")]
    Sink(String),

    /// Unknown profile name
    #[error("Unknown sound profile '{0}' (expected beep, chime or electronic)")]
    UnknownProfile(String),
}

/// Notification sink errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// User denied notification permission
    #[error("Notification permission denied")]
    PermissionDenied,

    /// Delivery failed
    #[error("Notification delivery failed: {0}")]
    Failed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
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
