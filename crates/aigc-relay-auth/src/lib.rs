//! Canonical request signing for the AIGC relay's control plane calls.
//!
//! Every outbound call to the voice-agent control plane is authenticated with
//! an HMAC-SHA256 signature over a canonical form of the request, keyed by a
//! signing key derived per day, region, and service from the long-term secret.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use aigc_relay_auth::{Credentials, OpenApiClient, RequestSigner, SigningContext};
//! use aigc_relay_auth::openapi::Action;
//! use aigc_relay_core::{Region, ServiceName};
//!
//! let signer = RequestSigner::new(Arc::new(Credentials::new("AKLTexample", "c2VjcmV0")));
//! let context = SigningContext::new(chrono::Utc::now(), Region::default(), ServiceName::default());
//!
//! let request = OpenApiClient::default()
//!     .build_request(Action::StopVoiceChat, &serde_json::json!({"TaskId": "t1"}))
//!     .unwrap();
//! let signed = signer.sign_http_request(request, &context).unwrap();
//! assert!(signed.headers().contains_key(http::header::AUTHORIZATION));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Key pair and credential lookup
//! - [`error`] - Signing and verification errors
//! - [`openapi`] - Control plane request assembly
//! - [`scheme`] - Constants of a signing family
//! - [`signer`] - Request signing
//! - [`signing_key`] - Day-scoped key derivation
//! - [`verify`] - Server-side signature verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod openapi;
pub mod scheme;
pub mod signer;
pub mod signing_key;
pub mod verify;

pub use canonical::{CanonicalRequest, hash_payload};
pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::AuthError;
pub use openapi::{Action, OpenApiClient, StopVoiceChatBody, UpdateCommand, UpdateVoiceChatBody};
pub use scheme::SigningScheme;
pub use signer::{RequestSignature, RequestSigner, SigningContext};
pub use signing_key::{SigningKey, derive_signing_key};
pub use verify::{AuthResult, verify_signed_request};
