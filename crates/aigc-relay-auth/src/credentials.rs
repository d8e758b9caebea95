//! Signing credentials and credential lookup.
//!
//! [`Credentials`] is the long-term key pair the relay signs outbound calls
//! with. It is built once at startup and shared read-only. The
//! [`CredentialProvider`] trait resolves a secret from an access key id on the
//! verifying side.

use std::collections::HashMap;
use std::fmt;

use aigc_relay_core::RelayConfig;

use crate::error::AuthError;

/// Long-term access key pair.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Create credentials from an access key id and a secret access key.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Take the OpenAPI key pair out of a validated relay configuration.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(&config.access_key_id, &config.secret_access_key)
    }

    /// The public access key id.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Trait for looking up secret access keys by access key id.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret access key for the given access key id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the access key id is not recognized.
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError>;
}

impl CredentialProvider for Credentials {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        if self.access_key_id == access_key_id {
            Ok(self.secret_access_key.clone())
        } else {
            Err(AuthError::AccessKeyNotFound(access_key_id.to_owned()))
        }
    }
}

/// An in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use aigc_relay_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("AKLTexample".to_owned(), "c2VjcmV0".to_owned()),
/// ]);
///
/// assert_eq!(provider.get_secret_key("AKLTexample").unwrap(), "c2VjcmV0");
/// ```
#[derive(Clone)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a provider from (access_key_id, secret_key) pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }
}

impl fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("access_key_ids", &self.credentials.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        self.credentials
            .get(access_key_id)
            .cloned()
            .ok_or_else(|| AuthError::AccessKeyNotFound(access_key_id.to_owned()))
    }
}
