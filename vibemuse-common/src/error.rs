//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling across the Vibemuse MCP servers.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration
//! - `Error::Api`: External REST API errors (includes endpoint and status)
//! - `Error::Validation`: Input validation failures
//! - `Error::Io`: File system operations

use thiserror::Error;

/// Unified error type for the common library.
///
/// This enum provides a single error type that can represent all error conditions
/// across the Vibemuse servers, enabling consistent error handling and reporting.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API errors with endpoint and HTTP status context
    ///
    /// Includes the API endpoint that failed, HTTP status code, and error message
    /// for debugging and user feedback.
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The API endpoint that was called
    /// * `status_code` - The HTTP status code returned
    /// * `message` - A description of the error
    ///
    /// # Example
    ///
    /// ```
    /// use vibemuse_common::error::Error;
    ///
    /// let err = Error::api(
    ///     "https://api.elevenlabs.io/v1/music",
    ///     500,
    ///     "Internal server error"
    /// );
    /// assert!(err.to_string().contains("api.elevenlabs.io"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use vibemuse_common::error::Error;
    ///
    /// let err = Error::validation("description cannot be empty");
    /// assert!(err.to_string().contains("description cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables or configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
