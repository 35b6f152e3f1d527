//! Core error types for studyroom-core.
//!
//! Per-item failures (a malformed time, an inverted session) are recoverable:
//! the functions that meet them skip the item and report it. `CoreError` is
//! reserved for the outer layers (configuration, file IO).

use std::path::PathBuf;
use thiserror::Error;

use crate::timeline::TimeOfDay;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schedule construction errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Failure to read an `HH:MM` time string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("missing ':' separator in '{0}'")]
    MissingColon(String),

    #[error("expected two digits for hours and minutes in '{0}'")]
    BadWidth(String),

    #[error("non-numeric time component in '{0}'")]
    NonNumeric(String),

    #[error("hour {0} out of range (0-23)")]
    HourOutOfRange(u32),

    #[error("minute {0} out of range (0-59)")]
    MinuteOutOfRange(u32),
}

/// Errors raised while building schedule values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A session or block whose end does not come after its start.
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange { start: TimeOfDay, end: TimeOfDay },

    /// A daily window whose end does not come after its start.
    #[error("Invalid day window: {start} - {end}")]
    InvalidWindow { start: TimeOfDay, end: TimeOfDay },

    /// A day index outside 0..=6.
    #[error("Unknown day index {0} (expected 0=Monday .. 6=Sunday)")]
    UnknownDay(u8),

    #[error(transparent)]
    Parse(#[from] TimeParseError),
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
