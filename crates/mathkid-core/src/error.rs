//! Error types for mathkid

use thiserror::Error;

/// Result type alias using MathKidError
pub type Result<T> = std::result::Result<T, MathKidError>;

/// Error type alias for convenience
pub type Error = MathKidError;

/// Boxed cause attached to service errors
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for mathkid
#[derive(Debug, Error)]
pub enum MathKidError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation service error: {message}")]
    Service {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MathKidError {
    /// Service error without an underlying cause
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
            source: None,
        }
    }

    /// Service error wrapping the failure that caused it
    pub fn service_with(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Service {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::CONFIG_ERROR,
            Self::EmptyInput(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

impl From<reqwest::Error> for MathKidError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "cannot reach the generation service".to_string()
        } else if err.is_decode() {
            "malformed response body".to_string()
        } else {
            "HTTP request failed".to_string()
        };
        Self::service_with(message, err)
    }
}
