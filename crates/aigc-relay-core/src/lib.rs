//! Configuration, shared types, and core errors for the AIGC relay.
//!
//! This crate holds the pieces every other relay crate depends on: the typed
//! [`RelayConfig`] loaded once at process start, the credential-scope types
//! ([`Region`], [`ServiceName`]), the configuration error type, and the
//! whole-second truncation every signed timestamp goes through.

mod config;
mod error;
mod time;
mod types;

pub use config::{DEFAULT_TOKEN_TTL_SECS, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use time::whole_seconds;
pub use types::{Region, ServiceName};
