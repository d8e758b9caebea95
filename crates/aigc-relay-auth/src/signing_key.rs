//! Scoped signing key derivation.
//!
//! The long-term secret never signs a request directly. Instead a key bound to
//! a single UTC day, region, and service is derived through an HMAC-SHA256
//! chain:
//!
//! ```text
//! DateKey              = HMAC-SHA256(marker + secret_key, yyyymmdd)
//! DateRegionKey        = HMAC-SHA256(DateKey, region)
//! DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
//! SigningKey           = HMAC-SHA256(DateRegionServiceKey, terminator)
//! ```
//!
//! Derivation is cheap and is repeated for every request; nothing is cached.

use std::fmt;

use chrono::NaiveDate;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;

use crate::error::AuthError;
use crate::scheme::SigningScheme;

type HmacSha256 = Hmac<Sha256>;

/// A signing key valid for one UTC day, region, and service.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    bytes: Vec<u8>,
    date: NaiveDate,
}

impl SigningKey {
    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The UTC day this key was derived for.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether the key may sign a request stamped on `date`.
    #[must_use]
    pub fn is_valid_for(&self, date: NaiveDate) -> bool {
        self.date == date
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("date", &self.date)
            .finish_non_exhaustive()
    }
}

/// Format a UTC day as the `yyyymmdd` date stamp used in credential scopes.
#[must_use]
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Derive the signing key for `date`, `region`, and `service`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] if `secret_key` is empty.
///
/// # Examples
///
/// ```
/// use aigc_relay_auth::scheme::SigningScheme;
/// use aigc_relay_auth::signing_key::derive_signing_key;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let key = derive_signing_key(&SigningScheme::VOLCENGINE, "c2VjcmV0", date, "cn-north-1", "rtc")
///     .unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// assert!(key.is_valid_for(date));
/// ```
pub fn derive_signing_key(
    scheme: &SigningScheme,
    secret_key: &str,
    date: NaiveDate,
    region: &str,
    service: &str,
) -> Result<SigningKey, AuthError> {
    if secret_key.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    let seed = format!("{}{secret_key}", scheme.key_marker);
    let date_key = hmac_sha256(seed.as_bytes(), date_stamp(date).as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    let bytes = hmac_sha256(&date_region_service_key, scheme.scope_terminator.as_bytes());

    Ok(SigningKey { bytes, date })
}

/// Compute HMAC-SHA256 and return the raw bytes.
pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
