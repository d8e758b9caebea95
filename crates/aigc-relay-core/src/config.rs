//! Relay configuration.
//!
//! All configuration is driven by environment variables and validated once at
//! startup. The resulting [`RelayConfig`] is immutable for the life of the
//! process.

use std::fmt;

use crate::error::{RelayError, RelayResult};
use crate::types::{Region, ServiceName};

/// Default lifetime of an issued room token: 48 hours.
pub const DEFAULT_TOKEN_TTL_SECS: u32 = 48 * 3600;

/// Global configuration for the relay.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Access key id used to sign OpenAPI requests.
    pub access_key_id: String,
    /// Secret access key used to sign OpenAPI requests.
    #[serde(skip_serializing)]
    pub secret_access_key: String,
    /// RTC application id embedded in room tokens.
    pub rtc_app_id: String,
    /// RTC application key that signs room tokens.
    #[serde(skip_serializing)]
    pub rtc_app_key: String,
    /// Host of the voice-agent control plane.
    pub api_host: String,
    /// OpenAPI version sent as the `Version` query parameter.
    pub api_version: String,
    /// Signing region.
    pub region: Region,
    /// Signing service.
    pub service: ServiceName,
    /// Lifetime of issued room tokens in seconds.
    pub token_ttl_secs: u64,
    /// Log level.
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            rtc_app_id: String::new(),
            rtc_app_key: String::new(),
            api_host: "rtc.volcengineapi.com".to_owned(),
            api_version: "2024-12-01".to_owned(),
            region: Region::default(),
            service: ServiceName::default(),
            token_ttl_secs: u64::from(DEFAULT_TOKEN_TTL_SECS),
            log_level: "info".to_owned(),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("rtc_app_id", &self.rtc_app_id)
            .field("rtc_app_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("api_version", &self.api_version)
            .field("region", &self.region)
            .field("service", &self.service)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl RelayConfig {
    /// Load configuration from environment variables and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is invalid.
    pub fn from_env() -> RelayResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key lookup and validate it.
    ///
    /// `from_env` delegates here; tests pass a map instead of touching the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RelayResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("VOLC_ACCESS_KEY_ID") {
            config.access_key_id = v;
        }
        if let Some(v) = lookup("VOLC_SECRET_ACCESS_KEY") {
            config.secret_access_key = v;
        }
        if let Some(v) = lookup("RTC_APP_ID") {
            config.rtc_app_id = v;
        }
        if let Some(v) = lookup("RTC_APP_KEY") {
            config.rtc_app_key = v;
        }
        if let Some(v) = lookup("RTC_API_HOST") {
            config.api_host = v;
        }
        if let Some(v) = lookup("RTC_API_VERSION") {
            config.api_version = v;
        }
        if let Some(v) = lookup("RTC_REGION") {
            config.region = Region::new(v);
        }
        if let Some(v) = lookup("RTC_SERVICE") {
            config.service = ServiceName::new(v);
        }
        if let Some(v) = lookup("RTC_TOKEN_TTL_SECS") {
            config.token_ttl_secs = v.parse().map_err(|_| RelayError::InvalidSetting {
                name: "RTC_TOKEN_TTL_SECS",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every required setting is present and every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> RelayResult<()> {
        let required = [
            ("VOLC_ACCESS_KEY_ID", &self.access_key_id),
            ("VOLC_SECRET_ACCESS_KEY", &self.secret_access_key),
            ("RTC_APP_ID", &self.rtc_app_id),
            ("RTC_APP_KEY", &self.rtc_app_key),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(RelayError::MissingSetting(name));
            }
        }

        if self.rtc_app_id.len() > usize::from(u8::MAX) {
            return Err(RelayError::InvalidSetting {
                name: "RTC_APP_ID",
                value: self.rtc_app_id.clone(),
            });
        }
        if self.token_ttl_secs == 0 {
            return Err(RelayError::InvalidSetting {
                name: "RTC_TOKEN_TTL_SECS",
                value: "0".to_owned(),
            });
        }
        if self.api_host.is_empty() {
            return Err(RelayError::MissingSetting("RTC_API_HOST"));
        }

        Ok(())
    }
}
