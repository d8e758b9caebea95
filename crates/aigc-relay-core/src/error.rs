//! Error types for the relay core.

use http::StatusCode;

/// Core error type for relay configuration.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A required setting was not provided.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    /// A setting was provided but could not be used.
    #[error("invalid value for {name}: {value}")]
    InvalidSetting {
        /// Environment variable name of the setting.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl RelayError {
    /// HTTP status the enclosing service should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Convenience result type for relay core operations.
pub type RelayResult<T> = Result<T, RelayError>;
