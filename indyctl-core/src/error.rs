/// Structured error types for indyctl-core.
///
/// Library consumers get composable `thiserror` errors; the `indyctl`
/// binary wraps them in `anyhow` with context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for indyctl-core operations
#[derive(Error, Debug)]
pub enum IndyError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Store key is not of the form packageType:type:name
    #[error("Invalid store key '{key}': {reason}")]
    InvalidStoreKey { key: String, reason: String },

    /// Store type is not one of remote, hosted, group
    #[error("Unknown store type '{value}'")]
    UnknownStoreType { value: String },

    /// Sort property is not a known store field
    #[error("Unknown sort property '{value}'")]
    UnknownSortProp { value: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Result type alias for indyctl-core operations
pub type Result<T> = std::result::Result<T, IndyError>;

impl IndyError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid store key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStoreKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndyError::invalid_key("maven:remote", "expected three parts");
        assert_eq!(
            err.to_string(),
            "Invalid store key 'maven:remote': expected three parts"
        );

        let err = IndyError::UnknownStoreType {
            value: "proxy".into(),
        };
        assert_eq!(err.to_string(), "Unknown store type 'proxy'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: IndyError = io_err.into();

        assert!(matches!(err, IndyError::Io { .. }));
    }
}
