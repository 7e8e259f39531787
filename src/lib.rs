// src/lib.rs

//! A stateless OpenID Connect ID Token validator.
//!
//! Given a compact RS256-signed token, the expected issuer, audience and
//! nonce, and the issuer's current signing keys, [`Validator`] decides
//! whether the token is authentic and was issued for this context.
//! Fetching and caching the discovery document and its keys is left to the
//! caller, behind the [`KeySetProvider`] trait.
//!
//! ```no_run
//! use oidc_token_validator::prelude::*;
//!
//! # fn run(id_token: &str, jwks_body: &str) -> Result<(), TokenValidatorError> {
//! let keys = KeySet::from_jwks_json(jwks_body)?;
//! let validator = Validator::default();
//! let trusted = validator.validate(
//!     Some(id_token),
//!     Some("https://issuer.example"),
//!     Some("client123"),
//!     Some("abc"),
//!     Some(&keys),
//!     Some(true),
//! )?;
//! # let _ = trusted;
//! # Ok(())
//! # }
//! ```

mod base64url;
pub mod clock;
pub mod config;
pub mod error;
pub mod keys;
pub mod model;
pub mod validator;

pub use keys::KeySetProvider;
pub use validator::Validator;

/// The public prelude for the `oidc-token-validator` crate.
///
/// This module re-exports the most commonly used types for convenience.
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{ConfigBuilder, ValidatorConfig};
    pub use crate::error::TokenValidatorError;
    pub use crate::keys::{KeySet, KeySetProvider, SigningKey};
    pub use crate::model::{JsonWebKey, JsonWebKeySet};
    pub use crate::validator::{IdTokenClaims, ValidationRequest, Validator, Verdict};
}
