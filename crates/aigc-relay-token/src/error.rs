//! Error types for access token issuance and verification.

use chrono::{DateTime, Utc};
use http::StatusCode;

/// Errors that can occur while encoding or verifying an access token.
///
/// Encoding is all-or-nothing: on error no token text is produced.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The app id or app key is empty.
    #[error("Invalid credentials: app id and app key must be non-empty")]
    InvalidCredentials,

    /// The token window or a privilege expiry is out of order.
    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    /// A length-prefixed field does not fit in its one-byte prefix.
    #[error("Field {field} is {len} bytes, at most 255 allowed")]
    FieldTooLong {
        /// Name of the field.
        field: &'static str,
        /// Actual byte length.
        len: usize,
    },

    /// The token text is not a well-formed token.
    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    /// The signature does not match the token contents.
    #[error("Token signature does not match")]
    TokenTampered,

    /// The token's validity window has ended.
    #[error("Token expired at {expired_at}")]
    TokenExpired {
        /// When the token stopped being valid.
        expired_at: DateTime<Utc>,
    },
}

impl TokenError {
    /// HTTP status the enclosing service should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidExpiry(_) | Self::FieldTooLong { .. } | Self::TokenMalformed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::TokenTampered | Self::TokenExpired { .. } => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_token_errors_to_status_codes() {
        assert_eq!(
            TokenError::TokenMalformed("x".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TokenError::FieldTooLong {
                field: "room_id",
                len: 300
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TokenError::TokenTampered.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TokenError::TokenExpired {
                expired_at: DateTime::UNIX_EPOCH
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_should_not_leak_details_in_tampered_message() {
        assert_eq!(
            TokenError::TokenTampered.to_string(),
            "Token signature does not match"
        );
    }
}
