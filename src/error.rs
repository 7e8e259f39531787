// src/error.rs

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TokenValidatorError>;

/// The primary error type for the `oidc-token-validator` library.
///
/// `InvalidArgument` and `MalformedToken` mean the validator was called with
/// unusable input. `InvalidIssuer`, `InvalidAudience`, `TokenExpired` and
/// `TokenNotYetValid` mean the token is authentic but was issued for a
/// different context. A token that no key verifies, or whose nonce does not
/// match, is not an error at all: `Validator::validate` returns `Ok(false)`.
#[derive(Debug, Error)]
pub enum TokenValidatorError {
    /// A required argument was absent or empty.
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },

    /// The token is not a well-formed compact serialization.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The `iss` claim does not match the expected issuer.
    #[error("Issuer mismatch. Expected: {expected}, Actual: {actual:?}")]
    InvalidIssuer {
        expected: String,
        actual: Option<String>,
    },

    /// The `aud` claim does not contain the expected audience.
    #[error("Audience mismatch. Expected: {expected}, Actual: {actual:?}")]
    InvalidAudience {
        expected: String,
        actual: Vec<String>,
    },

    /// The token expired (or carries no `exp` while a lifetime check was requested).
    #[error("Token expired at {expires_at:?} (now: {now})")]
    TokenExpired { expires_at: Option<i64>, now: i64 },

    /// The token's `nbf` claim lies in the future.
    #[error("Token is not valid before {not_before} (now: {now})")]
    TokenNotYetValid { not_before: i64, now: i64 },

    /// A JWKS document could not be parsed into a key set.
    #[error("Invalid JWKS document: {0}")]
    InvalidKeySet(#[from] serde_json::Error),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl TokenValidatorError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken(reason.into())
    }

    /// Returns `true` when the error reports a defect in the caller's input
    /// rather than a rejected token.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::MalformedToken(_)
        )
    }
}
