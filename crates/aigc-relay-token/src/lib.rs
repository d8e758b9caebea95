//! Room access tokens for the AIGC relay.
//!
//! A client joining a media room presents a token that names the room, the
//! user, a validity window, and a set of privileges, each with its own
//! expiry. The token is signed with the application key shared between the
//! relay and the media service, so the service can check it without calling
//! back.
//!
//! # Usage
//!
//! ```rust
//! use aigc_relay_token::{RoomGrantIssuer, RoomRequest, TokenCodec};
//!
//! let issuer = RoomGrantIssuer::new(TokenCodec::new("app1", "secret").unwrap());
//! let now = chrono::Utc::now();
//! let grant = issuer.issue(&RoomRequest::default(), now).unwrap();
//!
//! let verified = issuer.codec().verify(&grant.token, now).unwrap();
//! assert_eq!(verified.token().room_id(), grant.room_id);
//! ```
//!
//! # Modules
//!
//! - [`codec`] - Token signing and wire encoding
//! - [`error`] - Token errors
//! - [`privilege`] - Privilege kinds and per-privilege expiries
//! - [`room`] - Room-join grants
//! - [`token`] - Token claims

pub mod codec;
pub mod error;
pub mod privilege;
pub mod room;
pub mod token;

pub use codec::{SignedToken, TokenCodec};
pub use error::TokenError;
pub use privilege::{Privilege, PrivilegeSet};
pub use room::{AudioCodec, RoomGrant, RoomGrantIssuer, RoomRequest};
pub use token::{AccessToken, TOKEN_VERSION};
