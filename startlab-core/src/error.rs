//! Error types for startlab-core
//!
//! The `startlab` binary wraps these with `anyhow` context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for startlab-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Canonical encoding or payload decoding failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Payload failed required-field checks
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Config file could not be parsed
    #[error("Invalid config file {path:?}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Incomplete or contradictory settings
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for startlab-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_setting() {
        let err = CoreError::config("DB_POOL_SIZE must be a positive integer");
        assert_eq!(
            err.to_string(),
            "Configuration error: DB_POOL_SIZE must be a positive integer"
        );
    }

    #[test]
    fn validation_message_passes_through() {
        let err: CoreError = ValidationError::missing("type").into();
        assert_eq!(err.to_string(), "type is required");
    }

    #[test]
    fn missing_config_file_is_io() {
        let err: CoreError = io::Error::new(io::ErrorKind::NotFound, "startlab.toml").into();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
