//! Token signing and wire encoding.
//!
//! A token on the wire is base64url (no padding) of:
//!
//! ```text
//! appIdLen(1) | appId | signature(32) | body
//! body = version(1) | nonce(4 BE) | roomIdLen(1) roomId | userIdLen(1) userId
//!      | issuedAt(8 BE) | expireAt(8 BE) | count(1) | { kind(1) expiry(8 BE) }*
//! ```
//!
//! The signature is HMAC-SHA256 keyed by the app key over `body || appId`.
//! Decoding checks it before looking inside the body.

use std::fmt;

use aigc_relay_core::RelayConfig;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::TokenError;
use crate::privilege::{Privilege, PrivilegeSet};
use crate::token::{AccessToken, TOKEN_VERSION};

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag.
const SIGNATURE_LEN: usize = 32;

/// Longest value a one-byte length prefix can describe.
const MAX_FIELD_LEN: usize = 255;

/// Signs, encodes, and verifies access tokens for one application.
///
/// Built once from the process-wide app credentials and shared freely; every
/// method is a pure computation over its arguments.
#[derive(Clone)]
pub struct TokenCodec {
    app_id: String,
    app_key: Vec<u8>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// A token whose signature has been checked, with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    app_id: String,
    signature: [u8; SIGNATURE_LEN],
    token: AccessToken,
}

impl SignedToken {
    /// Application the token was issued for.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The HMAC-SHA256 tag carried by the token.
    #[must_use]
    pub fn signature(&self) -> &[u8; SIGNATURE_LEN] {
        &self.signature
    }

    /// The signed claims.
    #[must_use]
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Take the signed claims.
    #[must_use]
    pub fn into_token(self) -> AccessToken {
        self.token
    }
}

impl TokenCodec {
    /// Create a codec for `app_id`, signing with `app_key`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidCredentials`] if either value is empty and
    /// [`TokenError::FieldTooLong`] if `app_id` exceeds 255 bytes.
    pub fn new(app_id: impl Into<String>, app_key: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let app_id = app_id.into();
        let app_key = app_key.as_ref().to_vec();
        if app_id.is_empty() || app_key.is_empty() {
            return Err(TokenError::InvalidCredentials);
        }
        check_field_len("app_id", app_id.len())?;
        Ok(Self { app_id, app_key })
    }

    /// Create a codec from the RTC app credentials in the relay configuration.
    ///
    /// # Errors
    ///
    /// Same as [`TokenCodec::new`].
    pub fn from_config(config: &RelayConfig) -> Result<Self, TokenError> {
        Self::new(config.rtc_app_id.as_str(), config.rtc_app_key.as_bytes())
    }

    /// Application id written into every token.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Sign and encode `token`.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidExpiry`] if `expire_at` is not after
    ///   `issued_at`, or a privilege expires outside that window.
    /// - [`TokenError::FieldTooLong`] if the room or user id exceeds 255
    ///   bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use aigc_relay_token::{AccessToken, Privilege, TokenCodec};
    /// use chrono::{Duration, Utc};
    ///
    /// let codec = TokenCodec::new("app1", "secret").unwrap();
    /// let now = Utc::now();
    /// let expire = now + Duration::hours(1);
    /// let token = AccessToken::new("room1", "user1", now, expire)
    ///     .grant(Privilege::PublishStream, expire);
    ///
    /// let text = codec.encode(&token).unwrap();
    /// let verified = codec.verify(&text, now).unwrap();
    /// assert_eq!(verified.token().room_id(), "room1");
    /// ```
    pub fn encode(&self, token: &AccessToken) -> Result<String, TokenError> {
        let body = encode_body(token)?;
        let signature = self.sign(&body, self.app_id.as_bytes());

        let mut wire = Vec::with_capacity(1 + self.app_id.len() + SIGNATURE_LEN + body.len());
        push_prefixed(&mut wire, "app_id", self.app_id.as_bytes())?;
        wire.extend_from_slice(&signature);
        wire.extend_from_slice(&body);

        Ok(BASE64URL.encode(wire))
    }

    /// Decode `text` and check its signature. Expiry is not checked.
    ///
    /// # Errors
    ///
    /// - [`TokenError::TokenMalformed`] if `text` is not base64url or its
    ///   layout is inconsistent.
    /// - [`TokenError::TokenTampered`] if the signature does not match or the
    ///   token names another application.
    pub fn decode(&self, text: &str) -> Result<SignedToken, TokenError> {
        let wire = BASE64URL
            .decode(text.trim())
            .map_err(|e| TokenError::TokenMalformed(format!("not base64url: {e}")))?;

        let mut reader = Reader::new(&wire);
        let presented_app_id = reader.prefixed("app_id")?;
        let signature: [u8; SIGNATURE_LEN] = reader
            .take(SIGNATURE_LEN, "signature")?
            .try_into()
            .map_err(|_| TokenError::TokenMalformed("signature truncated".to_owned()))?;
        let body = reader.rest();

        let expected = self.sign(body, presented_app_id);
        if !bool::from(expected.as_slice().ct_eq(signature.as_slice())) {
            debug!(app_id = %self.app_id, "token signature mismatch");
            return Err(TokenError::TokenTampered);
        }
        if presented_app_id != self.app_id.as_bytes() {
            debug!(app_id = %self.app_id, "token issued for another application");
            return Err(TokenError::TokenTampered);
        }

        Ok(SignedToken {
            app_id: self.app_id.clone(),
            signature,
            token: decode_body(body)?,
        })
    }

    /// Decode `text`, check its signature, and check it has not expired at
    /// `now`.
    ///
    /// # Errors
    ///
    /// Everything [`TokenCodec::decode`] returns, plus
    /// [`TokenError::TokenExpired`] once `now` is past `expire_at`.
    pub fn verify(&self, text: &str, now: DateTime<Utc>) -> Result<SignedToken, TokenError> {
        let signed = self.decode(text)?;
        if signed.token.is_expired_at(now) {
            return Err(TokenError::TokenExpired {
                expired_at: signed.token.expire_at(),
            });
        }
        Ok(signed)
    }

    fn sign(&self, body: &[u8], app_id: &[u8]) -> [u8; SIGNATURE_LEN] {
        let mut mac =
            HmacSha256::new_from_slice(&self.app_key).expect("HMAC can accept keys of any length");
        mac.update(body);
        mac.update(app_id);
        let mut tag = [0u8; SIGNATURE_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        tag
    }
}

/// Validate the claims and serialize the signed body.
fn encode_body(token: &AccessToken) -> Result<Vec<u8>, TokenError> {
    let issued_at = token.issued_at();
    let expire_at = token.expire_at();
    if expire_at <= issued_at {
        return Err(TokenError::InvalidExpiry(format!(
            "expire_at {expire_at} is not after issued_at {issued_at}"
        )));
    }
    for (kind, expiry) in token.privileges().iter() {
        if expiry < issued_at || expiry > expire_at {
            return Err(TokenError::InvalidExpiry(format!(
                "{kind} expires at {expiry}, outside {issued_at}..={expire_at}"
            )));
        }
    }

    let mut body = Vec::with_capacity(64 + token.room_id().len() + token.user_id().len());
    body.push(token.version());
    body.extend_from_slice(&token.nonce().to_be_bytes());
    push_prefixed(&mut body, "room_id", token.room_id().as_bytes())?;
    push_prefixed(&mut body, "user_id", token.user_id().as_bytes())?;
    body.extend_from_slice(&epoch_seconds(issued_at)?.to_be_bytes());
    body.extend_from_slice(&epoch_seconds(expire_at)?.to_be_bytes());

    // At most one entry per kind, so the count always fits.
    let count = u8::try_from(token.privileges().len()).map_err(|_| TokenError::FieldTooLong {
        field: "privileges",
        len: token.privileges().len(),
    })?;
    body.push(count);
    for (kind, expiry) in token.privileges().iter() {
        body.push(kind.id());
        body.extend_from_slice(&epoch_seconds(expiry)?.to_be_bytes());
    }

    Ok(body)
}

/// Parse a body whose signature has already been checked.
fn decode_body(body: &[u8]) -> Result<AccessToken, TokenError> {
    let mut reader = Reader::new(body);

    let version = reader.u8("version")?;
    if version != TOKEN_VERSION {
        return Err(TokenError::TokenMalformed(format!(
            "unknown token version {version}"
        )));
    }
    let nonce = reader.u32("nonce")?;
    let room_id = reader.prefixed_str("room_id")?;
    let user_id = reader.prefixed_str("user_id")?;
    let issued_at = reader.timestamp("issued_at")?;
    let expire_at = reader.timestamp("expire_at")?;
    if expire_at <= issued_at {
        return Err(TokenError::TokenMalformed(
            "validity window is empty".to_owned(),
        ));
    }

    let count = reader.u8("privilege count")?;
    let mut privileges = PrivilegeSet::new();
    for _ in 0..count {
        let id = reader.u8("privilege kind")?;
        let kind = Privilege::from_id(id)
            .ok_or_else(|| TokenError::TokenMalformed(format!("unknown privilege kind {id}")))?;
        let expiry = reader.timestamp("privilege expiry")?;
        if privileges.contains(kind) {
            return Err(TokenError::TokenMalformed(format!(
                "privilege {kind} listed twice"
            )));
        }
        privileges.grant(kind, expiry);
    }

    if !reader.rest().is_empty() {
        return Err(TokenError::TokenMalformed(format!(
            "{} trailing bytes",
            reader.rest().len()
        )));
    }

    Ok(AccessToken::from_parts(
        version, nonce, room_id, user_id, issued_at, expire_at, privileges,
    ))
}

fn check_field_len(field: &'static str, len: usize) -> Result<(), TokenError> {
    if len > MAX_FIELD_LEN {
        return Err(TokenError::FieldTooLong { field, len });
    }
    Ok(())
}

fn push_prefixed(buf: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> Result<(), TokenError> {
    let len = u8::try_from(bytes.len()).map_err(|_| TokenError::FieldTooLong {
        field,
        len: bytes.len(),
    })?;
    buf.push(len);
    buf.extend_from_slice(bytes);
    Ok(())
}

fn epoch_seconds(at: DateTime<Utc>) -> Result<u64, TokenError> {
    u64::try_from(at.timestamp())
        .map_err(|_| TokenError::InvalidExpiry(format!("{at} is before the Unix epoch")))
}

/// Bounds-checked cursor over decoded token bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8], TokenError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| TokenError::TokenMalformed(format!("{field} truncated")))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn u8(&mut self, field: &str) -> Result<u8, TokenError> {
        Ok(self.take(1, field)?[0])
    }

    fn u32(&mut self, field: &str) -> Result<u32, TokenError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4, field)?);
        Ok(u32::from_be_bytes(buf))
    }

    fn u64(&mut self, field: &str) -> Result<u64, TokenError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, field)?);
        Ok(u64::from_be_bytes(buf))
    }

    fn prefixed(&mut self, field: &str) -> Result<&'a [u8], TokenError> {
        let len = self.u8(field)?;
        self.take(usize::from(len), field)
    }

    fn prefixed_str(&mut self, field: &str) -> Result<String, TokenError> {
        let bytes = self.prefixed(field)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| TokenError::TokenMalformed(format!("{field} is not UTF-8")))
    }

    fn timestamp(&mut self, field: &str) -> Result<DateTime<Utc>, TokenError> {
        let secs = self.u64(field)?;
        i64::try_from(secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| TokenError::TokenMalformed(format!("{field} out of range")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::new("app1", "secret").unwrap()
    }

    fn sample_token() -> AccessToken {
        let expire = t0() + Duration::seconds(3600);
        AccessToken::new("room1", "user1", t0(), expire)
            .grant(Privilege::PublishStream, expire)
            .grant(Privilege::SubscribeStream, expire)
            .with_nonce(0x0102_0304)
    }

    fn flip(text: &str, index: usize) -> String {
        let mut bytes = BASE64URL.decode(text).unwrap();
        bytes[index] ^= 0xFF;
        BASE64URL.encode(bytes)
    }

    #[test]
    fn test_should_round_trip_publish_and_subscribe_grant() {
        let codec = codec();
        let text = codec.encode(&sample_token()).unwrap();

        let decoded = codec.decode(&text).unwrap();
        assert_eq!(decoded.app_id(), "app1");
        let token = decoded.token();
        assert_eq!(token.room_id(), "room1");
        assert_eq!(token.user_id(), "user1");
        assert_eq!(
            token.privileges().get(Privilege::PublishStream),
            Some(t0() + Duration::seconds(3600))
        );
        assert_eq!(
            token.privileges().get(Privilege::PublishStream),
            token.privileges().get(Privilege::SubscribeStream)
        );
        assert_eq!(decoded.into_token(), sample_token());

        assert!(codec.verify(&text, t0() + Duration::seconds(1800)).is_ok());
        assert!(matches!(
            codec.verify(&text, t0() + Duration::seconds(3601)),
            Err(TokenError::TokenExpired { expired_at }) if expired_at == t0() + Duration::seconds(3600)
        ));
    }

    #[test]
    fn test_should_encode_exact_wire_layout() {
        let text = codec().encode(&sample_token()).unwrap();
        let wire = BASE64URL.decode(&text).unwrap();

        let issued = 1_748_779_200_u64;
        let expire = issued + 3600;
        let mut body = vec![1, 0x01, 0x02, 0x03, 0x04];
        body.push(5);
        body.extend_from_slice(b"room1");
        body.push(5);
        body.extend_from_slice(b"user1");
        body.extend_from_slice(&issued.to_be_bytes());
        body.extend_from_slice(&expire.to_be_bytes());
        body.push(2);
        body.push(0);
        body.extend_from_slice(&expire.to_be_bytes());
        body.push(4);
        body.extend_from_slice(&expire.to_be_bytes());

        let mut mac = HmacSha256::new_from_slice(b"secret").unwrap();
        mac.update(&body);
        mac.update(b"app1");
        let signature = mac.finalize().into_bytes();

        let mut expected = vec![4];
        expected.extend_from_slice(b"app1");
        expected.extend_from_slice(signature.as_slice());
        expected.extend_from_slice(&body);
        assert_eq!(wire, expected);
        assert!(!text.contains('=') && !text.contains('+') && !text.contains('/'));
    }

    #[test]
    fn test_should_encode_deterministically_for_fixed_nonce() {
        let codec = codec();
        assert_eq!(
            codec.encode(&sample_token()).unwrap(),
            codec.encode(&sample_token()).unwrap()
        );
    }

    #[test]
    fn test_should_ignore_grant_order() {
        let expire = t0() + Duration::seconds(60);
        let a = AccessToken::new("r", "u", t0(), expire)
            .grant(Privilege::SubscribeStream, expire)
            .grant(Privilege::PublishAudioStream, expire)
            .with_nonce(9);
        let b = AccessToken::new("r", "u", t0(), expire)
            .grant(Privilege::PublishAudioStream, expire)
            .grant(Privilege::SubscribeStream, expire)
            .with_nonce(9);
        assert_eq!(codec().encode(&a).unwrap(), codec().encode(&b).unwrap());
    }

    #[test]
    fn test_should_differ_by_nonce() {
        let codec = codec();
        let a = codec.encode(&sample_token().with_nonce(1)).unwrap();
        let b = codec.encode(&sample_token().with_nonce(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_should_detect_any_flipped_byte() {
        let codec = codec();
        let text = codec.encode(&sample_token()).unwrap();
        let len = BASE64URL.decode(&text).unwrap().len();

        assert!(codec.verify(&flip(&text, 0), t0()).is_err());
        for index in 1..len {
            let result = codec.verify(&flip(&text, index), t0());
            assert!(
                matches!(result, Err(TokenError::TokenTampered)),
                "byte {index}: {result:?}"
            );
        }
    }

    #[test]
    fn test_should_reject_token_signed_with_other_key() {
        let other = TokenCodec::new("app1", "not-the-secret").unwrap();
        let text = other.encode(&sample_token()).unwrap();
        assert!(matches!(codec().decode(&text), Err(TokenError::TokenTampered)));
    }

    #[test]
    fn test_should_reject_token_for_other_app() {
        let other = TokenCodec::new("app2", "secret").unwrap();
        let text = other.encode(&sample_token()).unwrap();
        assert!(matches!(codec().decode(&text), Err(TokenError::TokenTampered)));
    }

    #[test]
    fn test_should_honor_expiry_boundary() {
        let codec = codec();
        let now = t0() + Duration::seconds(100);

        let expired = AccessToken::new("r", "u", t0(), now - Duration::seconds(1));
        let text = codec.encode(&expired).unwrap();
        assert!(matches!(
            codec.verify(&text, now),
            Err(TokenError::TokenExpired { .. })
        ));
        assert!(codec.decode(&text).is_ok());

        let live = AccessToken::new("r", "u", t0(), now + Duration::seconds(1));
        let text = codec.encode(&live).unwrap();
        assert!(codec.verify(&text, now).is_ok());
    }

    #[test]
    fn test_should_reject_empty_window() {
        let token = AccessToken::new("r", "u", t0(), t0());
        assert!(matches!(
            codec().encode(&token),
            Err(TokenError::InvalidExpiry(_))
        ));
        let token = AccessToken::new("r", "u", t0(), t0() - Duration::seconds(1));
        assert!(matches!(
            codec().encode(&token),
            Err(TokenError::InvalidExpiry(_))
        ));
    }

    #[test]
    fn test_should_reject_privilege_outside_window() {
        let expire = t0() + Duration::hours(1);
        let late = AccessToken::new("r", "u", t0(), expire)
            .grant(Privilege::PublishStream, expire + Duration::seconds(1));
        assert!(matches!(
            codec().encode(&late),
            Err(TokenError::InvalidExpiry(_))
        ));

        let early = AccessToken::new("r", "u", t0(), expire)
            .grant(Privilege::PublishStream, t0() - Duration::seconds(1));
        assert!(matches!(
            codec().encode(&early),
            Err(TokenError::InvalidExpiry(_))
        ));
    }

    #[test]
    fn test_should_reject_overlong_fields() {
        let expire = t0() + Duration::hours(1);
        let room = "r".repeat(256);
        let token = AccessToken::new(room, "u", t0(), expire);
        assert!(matches!(
            codec().encode(&token),
            Err(TokenError::FieldTooLong { field: "room_id", len: 256 })
        ));

        let token = AccessToken::new("r".repeat(255), "u".repeat(255), t0(), expire);
        let text = codec().encode(&token).unwrap();
        assert_eq!(codec().decode(&text).unwrap().token().user_id().len(), 255);

        assert!(matches!(
            TokenCodec::new("a".repeat(256), "secret"),
            Err(TokenError::FieldTooLong { field: "app_id", .. })
        ));
    }

    #[test]
    fn test_should_round_trip_multibyte_and_empty_ids() {
        let expire = t0() + Duration::hours(1);
        let token = AccessToken::new("房间", "", t0(), expire).grant(Privilege::PublishStream, expire);
        let text = codec().encode(&token).unwrap();
        let decoded = codec().decode(&text).unwrap();
        assert_eq!(decoded.token().room_id(), "房间");
        assert_eq!(decoded.token().user_id(), "");

        let token = AccessToken::new("房".repeat(86), "u", t0(), expire);
        assert!(matches!(
            codec().encode(&token),
            Err(TokenError::FieldTooLong { field: "room_id", len: 258 })
        ));

        let room = "房".repeat(85);
        let token = AccessToken::new(room.clone(), "u", t0(), expire);
        let text = codec().encode(&token).unwrap();
        assert_eq!(codec().decode(&text).unwrap().token().room_id(), room);
    }

    #[test]
    fn test_should_share_codec_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenCodec>();
        assert_send_sync::<SignedToken>();
    }

    #[test]
    fn test_should_reject_empty_credentials() {
        assert!(matches!(
            TokenCodec::new("", "secret"),
            Err(TokenError::InvalidCredentials)
        ));
        assert!(matches!(
            TokenCodec::new("app1", ""),
            Err(TokenError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_should_reject_malformed_text() {
        let codec = codec();
        assert!(matches!(
            codec.decode("not base64!"),
            Err(TokenError::TokenMalformed(_))
        ));
        assert!(matches!(codec.decode(""), Err(TokenError::TokenMalformed(_))));

        let text = codec.encode(&sample_token()).unwrap();
        let wire = BASE64URL.decode(&text).unwrap();
        let truncated = BASE64URL.encode(&wire[..20]);
        assert!(matches!(
            codec.decode(&truncated),
            Err(TokenError::TokenMalformed(_))
        ));
    }

    #[test]
    fn test_should_reject_correctly_signed_but_unknown_body() {
        let codec = codec();
        let resign = |body: &[u8]| {
            let mut wire = vec![4];
            wire.extend_from_slice(b"app1");
            wire.extend_from_slice(&codec.sign(body, b"app1"));
            wire.extend_from_slice(body);
            BASE64URL.encode(wire)
        };

        let text = codec.encode(&sample_token()).unwrap();
        let wire = BASE64URL.decode(&text).unwrap();
        let body = &wire[1 + 4 + SIGNATURE_LEN..];

        let mut wrong_version = body.to_vec();
        wrong_version[0] = 2;
        assert!(matches!(
            codec.decode(&resign(&wrong_version)),
            Err(TokenError::TokenMalformed(_))
        ));

        let mut trailing = body.to_vec();
        trailing.push(0);
        assert!(matches!(
            codec.decode(&resign(&trailing)),
            Err(TokenError::TokenMalformed(_))
        ));

        let mut unknown_kind = body.to_vec();
        let first_kind = body.len() - 2 * 9;
        unknown_kind[first_kind] = 9;
        assert!(matches!(
            codec.decode(&resign(&unknown_kind)),
            Err(TokenError::TokenMalformed(_))
        ));
    }

    #[test]
    fn test_should_build_codec_from_config() {
        let config = RelayConfig {
            rtc_app_id: "app1".to_owned(),
            rtc_app_key: "secret".to_owned(),
            ..RelayConfig::default()
        };
        let codec = TokenCodec::from_config(&config).unwrap();
        assert_eq!(codec.app_id(), "app1");
        assert!(!format!("{codec:?}").contains("secret"));
    }
}
