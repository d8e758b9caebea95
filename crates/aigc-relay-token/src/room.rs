//! Room-join grants.
//!
//! A grant gives a client everything it needs to join a freshly named room
//! together with a voice agent: the room id, its own user id, the agent's user
//! id, the task id of the agent, and a token publishing and subscribing until
//! the grant expires.

use std::fmt;

use aigc_relay_core::{DEFAULT_TOKEN_TTL_SECS, RelayConfig};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::codec::TokenCodec;
use crate::error::TokenError;
use crate::privilege::Privilege;
use crate::token::AccessToken;

/// Audio codec of a room, carried as the room id prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AudioCodec {
    /// Opus.
    Opus,
    /// G.711 A-law.
    #[default]
    G711A,
    /// G.722.
    G722,
    /// AAC.
    Aac,
}

impl AudioCodec {
    /// Room id prefix for this codec.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opus => "OPUS",
            Self::G711A => "G711A",
            Self::G722 => "G722",
            Self::Aac => "AAC",
        }
    }

    /// Resolve a requested codec name. Names are matched exactly; anything
    /// unrecognized, or no name at all, selects [`AudioCodec::G711A`].
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("OPUS") => Self::Opus,
            Some("G722") => Self::G722,
            Some("AAC") => Self::Aac,
            _ => Self::G711A,
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a client asks for when joining.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomRequest {
    /// Requested codec name.
    pub audio_codec: Option<String>,
    /// Inserted into the room id after the codec prefix.
    pub room_identifier: String,
    /// Inserted into the client's user id.
    pub uid_identifier: String,
    /// Inserted into the agent's user id.
    pub bot_identifier: String,
}

/// Everything a client needs to join a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomGrant {
    /// The room to join.
    pub room_id: String,
    /// The client's user id.
    #[serde(rename = "uid")]
    pub user_id: String,
    /// The voice agent's user id.
    #[serde(rename = "bot_uid")]
    pub bot_user_id: String,
    /// Task id of the voice agent.
    pub task_id: String,
    /// RTC application id.
    pub app_id: String,
    /// Access token for `user_id` in `room_id`.
    pub token: String,
}

/// Issues room grants signed by one application's key.
#[derive(Debug, Clone)]
pub struct RoomGrantIssuer {
    codec: TokenCodec,
    ttl: Duration,
}

impl RoomGrantIssuer {
    /// Create an issuer with the default lifetime.
    #[must_use]
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec,
            ttl: Duration::seconds(i64::from(DEFAULT_TOKEN_TTL_SECS)),
        }
    }

    /// Create an issuer from the RTC app credentials and token lifetime in
    /// the relay configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidCredentials`] if the app credentials are
    /// missing and [`TokenError::InvalidExpiry`] if the lifetime is zero or
    /// out of range.
    pub fn from_config(config: &RelayConfig) -> Result<Self, TokenError> {
        let ttl = i64::try_from(config.token_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                TokenError::InvalidExpiry(format!(
                    "token lifetime of {} seconds is out of range",
                    config.token_ttl_secs
                ))
            })?;
        Self::new(TokenCodec::from_config(config)?).with_ttl(ttl)
    }

    /// Use `ttl` as the grant lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidExpiry`] unless `ttl` is at least one
    /// second.
    pub fn with_ttl(mut self, ttl: Duration) -> Result<Self, TokenError> {
        if ttl < Duration::seconds(1) {
            return Err(TokenError::InvalidExpiry(format!(
                "token lifetime must be at least one second, got {ttl}"
            )));
        }
        self.ttl = ttl;
        Ok(self)
    }

    /// The codec signing issued tokens.
    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Grant lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Name a new room for `request` and issue a token valid from `now` for
    /// the configured lifetime, with publish and subscribe privileges.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::FieldTooLong`] if an identifier makes a room or
    /// user id longer than 255 bytes.
    pub fn issue(&self, request: &RoomRequest, now: DateTime<Utc>) -> Result<RoomGrant, TokenError> {
        let codec = AudioCodec::from_name(request.audio_codec.as_deref());
        let id = Uuid::new_v4().simple().to_string();

        let room_id = format!("{codec}{}{id}", request.room_identifier);
        let user_id = format!("user{}{id}", request.uid_identifier);
        let bot_user_id = format!("bot{}{id}", request.bot_identifier);

        let expire_at = now + self.ttl;
        let token = AccessToken::new(room_id.as_str(), user_id.as_str(), now, expire_at)
            .grant(Privilege::SubscribeStream, expire_at)
            .grant(Privilege::PublishStream, expire_at);
        let token = self.codec.encode(&token)?;

        info!(
            room_id = %room_id,
            user_id = %user_id,
            bot_user_id = %bot_user_id,
            expire_at = %expire_at,
            "issued room grant"
        );

        Ok(RoomGrant {
            room_id,
            user_id,
            bot_user_id,
            task_id: id,
            app_id: self.codec.app_id().to_owned(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn issuer() -> RoomGrantIssuer {
        RoomGrantIssuer::new(TokenCodec::new("app1", "secret").unwrap())
    }

    #[test]
    fn test_should_share_issuer_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RoomGrantIssuer>();
    }

    #[test]
    fn test_should_default_to_configured_token_lifetime() {
        let grant = issuer().issue(&RoomRequest::default(), t0()).unwrap();
        let token = issuer().codec().decode(&grant.token).unwrap().into_token();
        assert_eq!(
            token.expire_at(),
            t0() + Duration::seconds(i64::from(DEFAULT_TOKEN_TTL_SECS))
        );
    }

    #[test]
    fn test_should_resolve_codec_names_exactly() {
        assert_eq!(AudioCodec::from_name(Some("OPUS")), AudioCodec::Opus);
        assert_eq!(AudioCodec::from_name(Some("AAC")), AudioCodec::Aac);
        assert_eq!(AudioCodec::from_name(Some("G722")), AudioCodec::G722);
        assert_eq!(AudioCodec::from_name(Some("opus")), AudioCodec::G711A);
        assert_eq!(AudioCodec::from_name(Some("MP3")), AudioCodec::G711A);
        assert_eq!(AudioCodec::from_name(None), AudioCodec::G711A);
    }

    #[test]
    fn test_should_name_room_and_users_from_one_id() {
        let request = RoomRequest {
            audio_codec: Some("OPUS".to_owned()),
            room_identifier: "demo".to_owned(),
            uid_identifier: "alice".to_owned(),
            bot_identifier: "agent".to_owned(),
        };
        let grant = issuer().issue(&request, t0()).unwrap();

        assert_eq!(grant.task_id.len(), 32);
        assert!(grant.task_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(grant.room_id, format!("OPUSdemo{}", grant.task_id));
        assert_eq!(grant.user_id, format!("useralice{}", grant.task_id));
        assert_eq!(grant.bot_user_id, format!("botagent{}", grant.task_id));
        assert_eq!(grant.app_id, "app1");
    }

    #[test]
    fn test_should_default_to_g711a_with_empty_identifiers() {
        let request: RoomRequest = serde_json::from_str("{}").unwrap();
        let grant = issuer().issue(&request, t0()).unwrap();
        assert_eq!(grant.room_id, format!("G711A{}", grant.task_id));
        assert_eq!(grant.user_id, format!("user{}", grant.task_id));
        assert_eq!(grant.bot_user_id, format!("bot{}", grant.task_id));
    }

    #[test]
    fn test_should_issue_token_for_grant_with_ttl() {
        let issuer = issuer();
        let grant = issuer.issue(&RoomRequest::default(), t0()).unwrap();

        let verified = issuer
            .codec()
            .verify(&grant.token, t0() + Duration::hours(47))
            .unwrap();
        let token = verified.token();
        let expire_at = t0() + Duration::hours(48);
        assert_eq!(token.room_id(), grant.room_id);
        assert_eq!(token.user_id(), grant.user_id);
        assert_eq!(token.expire_at(), expire_at);
        assert_eq!(
            token.privileges().get(Privilege::PublishStream),
            Some(expire_at)
        );
        assert_eq!(
            token.privileges().get(Privilege::SubscribeStream),
            Some(expire_at)
        );
        assert_eq!(token.privileges().len(), 2);

        assert!(matches!(
            issuer
                .codec()
                .verify(&grant.token, expire_at + Duration::seconds(1)),
            Err(TokenError::TokenExpired { .. })
        ));
    }

    #[test]
    fn test_should_give_each_grant_a_fresh_room() {
        let issuer = issuer();
        let a = issuer.issue(&RoomRequest::default(), t0()).unwrap();
        let b = issuer.issue(&RoomRequest::default(), t0()).unwrap();
        assert_ne!(a.room_id, b.room_id);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_should_serialize_grant_with_client_field_names() {
        let grant = issuer().issue(&RoomRequest::default(), t0()).unwrap();
        let json = serde_json::to_value(&grant).unwrap();
        for key in ["room_id", "uid", "bot_uid", "task_id", "app_id", "token"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_should_take_ttl_from_config() {
        let config = RelayConfig {
            rtc_app_id: "app1".to_owned(),
            rtc_app_key: "secret".to_owned(),
            token_ttl_secs: 600,
            ..RelayConfig::default()
        };
        let issuer = RoomGrantIssuer::from_config(&config).unwrap();
        assert_eq!(issuer.ttl(), Duration::minutes(10));

        let config = RelayConfig {
            token_ttl_secs: 0,
            ..config
        };
        assert!(matches!(
            RoomGrantIssuer::from_config(&config),
            Err(TokenError::InvalidExpiry(_))
        ));
    }

    #[test]
    fn test_should_reject_overlong_identifier() {
        let request = RoomRequest {
            room_identifier: "x".repeat(250),
            ..RoomRequest::default()
        };
        assert!(matches!(
            issuer().issue(&request, t0()),
            Err(TokenError::FieldTooLong { field: "room_id", .. })
        ));
    }
}
