// src/validator.rs

mod claims;
mod decode;
mod signature;

pub use claims::IdTokenClaims;

use crate::clock::{Clock, SystemClock};
use crate::config::ValidatorConfig;
use crate::error::{Result, TokenValidatorError};
use crate::keys::KeySetProvider;
use claims::{check_claims, Expectations, LifetimePolicy};
use decode::decode_token;
use signature::find_verifying_key;
use std::sync::Arc;
use tracing::{debug, field, instrument, Span};

/// The trust decision for a token that could be decoded.
///
/// Each variant names the first gate the token failed. Callers who need to
/// react differently to each reason (redirect, re-authenticate, hard fail)
/// can match exhaustively; `Validator::validate` folds these into the
/// `bool`-or-error shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Signature, issuer, audience, lifetime and nonce all check out.
    Accepted(IdTokenClaims),
    RejectedIssuer { actual: Option<String> },
    RejectedAudience { actual: Vec<String> },
    RejectedExpired { expires_at: Option<i64>, now: i64 },
    RejectedNotYetValid { not_before: i64, now: i64 },
    /// No key in the set verified the signature, or the nonce did not match.
    RejectedNonceOrKey,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// The inputs of a single validation call.
///
/// Every field is optional so that an omitted argument can be reported as
/// `InvalidArgument` instead of being impossible to express.
#[derive(Clone, Copy, Default)]
pub struct ValidationRequest<'a> {
    pub token: Option<&'a str>,
    pub issuer: Option<&'a str>,
    pub audience: Option<&'a str>,
    pub nonce: Option<&'a str>,
    pub key_set: Option<&'a dyn KeySetProvider>,
    pub check_lifetime: Option<bool>,
}

impl<'a> ValidationRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn issuer(mut self, issuer: &'a str) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn audience(mut self, audience: &'a str) -> Self {
        self.audience = Some(audience);
        self
    }

    pub fn nonce(mut self, nonce: &'a str) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn key_set(mut self, key_set: &'a dyn KeySetProvider) -> Self {
        self.key_set = Some(key_set);
        self
    }

    pub fn check_lifetime(mut self, check_lifetime: bool) -> Self {
        self.check_lifetime = Some(check_lifetime);
        self
    }
}

/// The OIDC ID Token validator.
///
/// A `Validator` holds only immutable settings and a clock. It keeps no state
/// between calls, so one instance can be shared freely across threads and
/// every call is independent of every other.
#[derive(Clone)]
pub struct Validator {
    config: ValidatorConfig,
    clock: Arc<dyn Clock>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl Validator {
    /// Creates a new `Validator` with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the wall clock used for lifetime checks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates an OIDC ID Token.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the token is signed by a key in `key_set` and its
    ///   issuer, audience, lifetime (when `check_lifetime` is `Some(true)`)
    ///   and nonce all match.
    /// * `Ok(false)` if no key verifies the signature (including an empty key
    ///   set) or the nonce does not match.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if any argument is absent or an input string is empty.
    /// * `MalformedToken` if `token` is not a decodable compact token.
    /// * `InvalidIssuer`, `InvalidAudience`, `TokenExpired`, `TokenNotYetValid`
    ///   if the token is authentic but fails that claims check.
    pub fn validate(
        &self,
        token: Option<&str>,
        issuer: Option<&str>,
        audience: Option<&str>,
        nonce: Option<&str>,
        key_set: Option<&dyn KeySetProvider>,
        check_lifetime: Option<bool>,
    ) -> Result<bool> {
        let request = ValidationRequest {
            token,
            issuer,
            audience,
            nonce,
            key_set,
            check_lifetime,
        };
        match self.evaluate(&request)? {
            Verdict::Accepted(_) => Ok(true),
            Verdict::RejectedNonceOrKey => Ok(false),
            Verdict::RejectedIssuer { actual } => Err(TokenValidatorError::InvalidIssuer {
                expected: issuer.unwrap_or_default().to_string(),
                actual,
            }),
            Verdict::RejectedAudience { actual } => Err(TokenValidatorError::InvalidAudience {
                expected: audience.unwrap_or_default().to_string(),
                actual,
            }),
            Verdict::RejectedExpired { expires_at, now } => {
                Err(TokenValidatorError::TokenExpired { expires_at, now })
            }
            Verdict::RejectedNotYetValid { not_before, now } => {
                Err(TokenValidatorError::TokenNotYetValid { not_before, now })
            }
        }
    }

    /// Decodes and verifies a token and reports the trust decision.
    ///
    /// The `Err` channel only carries `InvalidArgument` and `MalformedToken`:
    /// problems with the call itself. Everything that says something about
    /// the token's trustworthiness is a `Verdict`.
    #[instrument(skip_all, fields(kid = field::Empty), err)]
    pub fn evaluate(&self, request: &ValidationRequest<'_>) -> Result<Verdict> {
        let token = require_text(request.token, "token")?;
        let issuer = require_text(request.issuer, "issuer")?;
        let audience = require_text(request.audience, "audience")?;
        let nonce = require_text(request.nonce, "nonce")?;
        let key_set = request.key_set.ok_or(TokenValidatorError::InvalidArgument {
            argument: "key_set",
            reason: "must be provided",
        })?;
        let check_lifetime = request.check_lifetime.ok_or(TokenValidatorError::InvalidArgument {
            argument: "check_lifetime",
            reason: "must be specified",
        })?;

        let decoded = decode_token(token, self.config.max_token_length)?;
        if let Some(kid) = decoded.header.kid.as_deref() {
            Span::current().record("kid", kid);
        }

        let keys = key_set.signing_keys();
        if keys.is_empty() {
            debug!("Key set is empty; no key is trusted.");
            return Ok(Verdict::RejectedNonceOrKey);
        }
        let Some(key) = find_verifying_key(
            &decoded.header,
            decoded.signing_input.as_bytes(),
            &decoded.signature,
            keys,
        ) else {
            debug!(candidates = keys.len(), "No signing key verified the token.");
            return Ok(Verdict::RejectedNonceOrKey);
        };
        debug!(kid = ?key.kid(), "Signature verified.");

        let lifetime = check_lifetime.then(|| LifetimePolicy {
            now: self.clock.now_secs(),
            leeway: i64::try_from(self.config.leeway.as_secs()).unwrap_or(i64::MAX),
        });
        let verdict = check_claims(
            decoded.claims,
            &Expectations {
                issuer,
                audience,
                nonce,
                lifetime,
            },
        );
        debug!(accepted = verdict.is_accepted(), "Claims checked.");
        Ok(verdict)
    }
}

fn require_text<'a>(value: Option<&'a str>, argument: &'static str) -> Result<&'a str> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(TokenValidatorError::InvalidArgument {
            argument,
            reason: "must not be empty",
        }),
        None => Err(TokenValidatorError::InvalidArgument {
            argument,
            reason: "must be provided",
        }),
    }
}
