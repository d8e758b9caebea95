//! Error types for request signing and verification.
//!
//! All failures are represented by [`AuthError`]. Every variant is a local,
//! deterministic validation failure: re-invoking with the same input fails the
//! same way.

use http::StatusCode;

/// Errors that can occur while signing or verifying an OpenAPI request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request cannot be canonicalized (empty method, relative path,
    /// non-ASCII header value, missing host).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The secret key is empty.
    #[error("Invalid credentials: secret key is empty")]
    InvalidCredentials,

    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The signing algorithm does not belong to the configured scheme.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A header referenced in `SignedHeaders` is missing.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The `Credential` component does not match
    /// `AKID/date/region/service/<terminator>`.
    #[error("Invalid credential scope")]
    InvalidCredentialScope,

    /// The access key id was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}

impl AuthError {
    /// HTTP status the enclosing service should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_)
            | Self::InvalidAuthHeader
            | Self::UnsupportedAlgorithm(_)
            | Self::MissingHeader(_)
            | Self::InvalidCredentialScope => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::MissingAuthHeader
            | Self::AccessKeyNotFound(_)
            | Self::SignatureDoesNotMatch => StatusCode::UNAUTHORIZED,
        }
    }
}
