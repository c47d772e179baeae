//! Error types and handling for Stromtarif
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting. Every variant carries
//! owned strings only, so errors are `Clone` and can be cached next to
//! successful fetch results.

use thiserror::Error;

/// Result type alias for Stromtarif operations
pub type Result<T> = std::result::Result<T, StromError>;

/// Main error type for Stromtarif
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StromError {
    /// Caller supplied an unusable value (e.g. a non-positive row count)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Upstream API could not be reached or answered with a failure status
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Upstream API answered with a body that could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors of local files
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// HTTP/Web server errors
    #[error("Web server error: {message}")]
    Web { message: String },
}

impl StromError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        StromError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        StromError::Transport {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        StromError::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        StromError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        StromError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        StromError::Io {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        StromError::Web {
            message: message.into(),
        }
    }

    /// Stable tag of the error class, as reported in logs
    pub fn kind(&self) -> &'static str {
        match self {
            StromError::InvalidInput { .. } => "invalid_input",
            StromError::Transport { .. } => "transport_error",
            StromError::Parse { .. } => "parse_error",
            StromError::Config { .. } => "config_error",
            StromError::Validation { .. } => "validation_error",
            StromError::Io { .. } => "io_error",
            StromError::Serialization { .. } => "serialization_error",
            StromError::Web { .. } => "web_error",
        }
    }
}

impl From<std::io::Error> for StromError {
    fn from(err: std::io::Error) -> Self {
        StromError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StromError {
    fn from(err: serde_yaml::Error) -> Self {
        StromError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StromError {
    fn from(err: serde_json::Error) -> Self {
        StromError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StromError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StromError::parse(err.to_string())
        } else {
            StromError::transport(err.to_string())
        }
    }
}
