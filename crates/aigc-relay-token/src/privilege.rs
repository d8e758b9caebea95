//! Privileges granted by a room access token.

use std::collections::BTreeMap;
use std::fmt;

use aigc_relay_core::whole_seconds;
use chrono::{DateTime, Utc};

/// A permission a token holder may exercise in a room.
///
/// The discriminant is the kind id carried on the wire, and the derived
/// ordering follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Privilege {
    /// Publish any stream.
    PublishStream = 0,
    /// Publish the audio stream only.
    PublishAudioStream = 1,
    /// Publish the video stream only.
    PublishVideoStream = 2,
    /// Publish the data stream only.
    PublishDataStream = 3,
    /// Subscribe to other users' streams.
    SubscribeStream = 4,
}

impl Privilege {
    /// Every privilege, in kind id order.
    pub const ALL: [Self; 5] = [
        Self::PublishStream,
        Self::PublishAudioStream,
        Self::PublishVideoStream,
        Self::PublishDataStream,
        Self::SubscribeStream,
    ];

    /// The kind id written into the token.
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a privilege by kind id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Short name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PublishStream => "PublishStream",
            Self::PublishAudioStream => "PublishAudioStream",
            Self::PublishVideoStream => "PublishVideoStream",
            Self::PublishDataStream => "PublishDataStream",
            Self::SubscribeStream => "SubscribeStream",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privileges mapped to their own expiry instants.
///
/// Iteration is always in kind id order, whatever order the grants were made
/// in, so two sets with the same entries serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeSet {
    entries: BTreeMap<Privilege, DateTime<Utc>>,
}

impl PrivilegeSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `kind` until `expires_at`, replacing any earlier grant of the
    /// same kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use aigc_relay_token::{Privilege, PrivilegeSet};
    /// use chrono::{Duration, Utc};
    ///
    /// let now = Utc::now();
    /// let mut set = PrivilegeSet::new();
    /// set.grant(Privilege::PublishStream, now + Duration::hours(2));
    /// set.grant(Privilege::PublishStream, now + Duration::hours(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn grant(&mut self, kind: Privilege, expires_at: DateTime<Utc>) -> &mut Self {
        self.entries.insert(kind, whole_seconds(expires_at));
        self
    }

    /// Expiry of `kind`, if granted.
    #[must_use]
    pub fn get(&self, kind: Privilege) -> Option<DateTime<Utc>> {
        self.entries.get(&kind).copied()
    }

    /// Whether `kind` is granted.
    #[must_use]
    pub fn contains(&self, kind: Privilege) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Number of granted privileges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grants in kind id order.
    pub fn iter(&self) -> impl Iterator<Item = (Privilege, DateTime<Utc>)> + '_ {
        self.entries.iter().map(|(kind, expiry)| (*kind, *expiry))
    }
}

impl FromIterator<(Privilege, DateTime<Utc>)> for PrivilegeSet {
    fn from_iter<I: IntoIterator<Item = (Privilege, DateTime<Utc>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (kind, expires_at) in iter {
            set.grant(kind, expires_at);
        }
        set
    }
}
