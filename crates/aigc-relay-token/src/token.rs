//! Access token claims.

use aigc_relay_core::whole_seconds;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::privilege::{Privilege, PrivilegeSet};

/// The only token layout version this crate writes or reads.
pub const TOKEN_VERSION: u8 = 1;

/// The claims of a room access token, before signing.
///
/// An `AccessToken` is a value: changing a claim means building a new one and
/// encoding it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    version: u8,
    nonce: u32,
    room_id: String,
    user_id: String,
    issued_at: DateTime<Utc>,
    expire_at: DateTime<Utc>,
    privileges: PrivilegeSet,
}

impl AccessToken {
    /// Claims for `user_id` in `room_id`, valid from `issued_at` to
    /// `expire_at`, with a random nonce and no privileges yet.
    ///
    /// Instants are truncated to whole seconds. Ordering of the window is
    /// checked when the token is encoded.
    #[must_use]
    pub fn new(
        room_id: impl Into<String>,
        user_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        expire_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: TOKEN_VERSION,
            nonce: random_nonce(),
            room_id: room_id.into(),
            user_id: user_id.into(),
            issued_at: whole_seconds(issued_at),
            expire_at: whole_seconds(expire_at),
            privileges: PrivilegeSet::new(),
        }
    }

    /// Grant `kind` until `expires_at`.
    #[must_use]
    pub fn grant(mut self, kind: Privilege, expires_at: DateTime<Utc>) -> Self {
        self.privileges.grant(kind, expires_at);
        self
    }

    /// Replace the whole privilege set.
    #[must_use]
    pub fn with_privileges(mut self, privileges: PrivilegeSet) -> Self {
        self.privileges = privileges;
        self
    }

    /// Use a fixed nonce instead of the random one.
    #[must_use]
    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    /// Rebuild claims read back from the wire.
    pub(crate) fn from_parts(
        version: u8,
        nonce: u32,
        room_id: String,
        user_id: String,
        issued_at: DateTime<Utc>,
        expire_at: DateTime<Utc>,
        privileges: PrivilegeSet,
    ) -> Self {
        Self {
            version,
            nonce,
            room_id,
            user_id,
            issued_at,
            expire_at,
            privileges,
        }
    }

    /// Layout version.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Replay-distinguishing nonce.
    #[must_use]
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Room the token admits to.
    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// User the token was issued to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Start of the validity window.
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// End of the validity window.
    #[must_use]
    pub fn expire_at(&self) -> DateTime<Utc> {
        self.expire_at
    }

    /// Granted privileges.
    #[must_use]
    pub fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    /// Whether the window has ended at `now`. The last valid second is
    /// `expire_at` itself.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expire_at
    }
}

/// Four random bytes taken from a v4 UUID.
fn random_nonce() -> u32 {
    let bytes = Uuid::new_v4().into_bytes();
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
