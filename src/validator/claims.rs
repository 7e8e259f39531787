// src/validator/claims.rs

use super::Verdict;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// The claims decoded from an ID Token payload.
///
/// Only the claims the validator reasons about are typed; anything else in
/// the payload is ignored. Every claim is optional at decode time so that a
/// missing claim becomes a rejection in the claims checks rather than a
/// decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdTokenClaims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, deserialize_with = "deserialize_audience")]
    aud: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_numeric_date")]
    exp: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_numeric_date")]
    iat: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_numeric_date")]
    nbf: Option<i64>,
    #[serde(default)]
    nonce: Option<String>,
}

impl IdTokenClaims {
    pub fn issuer(&self) -> Option<&str> {
        self.iss.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// All audiences, whether the token carried `aud` as a string or an array.
    /// Empty when the claim is absent.
    pub fn audiences(&self) -> &[String] {
        &self.aud
    }

    /// Expiration time, in seconds since the Unix epoch.
    pub fn expires_at(&self) -> Option<i64> {
        self.exp
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.iat
    }

    pub fn not_before(&self) -> Option<i64> {
        self.nbf
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }
}

/// Deserialize audience as either string or array
fn deserialize_audience<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Audience {
        Single(String),
        Multiple(Vec<String>),
    }

    Ok(match Option::<Audience>::deserialize(deserializer)? {
        Some(Audience::Single(aud)) => vec![aud],
        Some(Audience::Multiple(auds)) => auds,
        None => Vec::new(),
    })
}

/// NumericDate (RFC 7519 §2): a JSON number of seconds, possibly fractional.
fn deserialize_numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(secs) = number.as_i64() {
        return Ok(Some(secs));
    }
    match number.as_f64() {
        Some(secs) if secs.is_finite() && secs.abs() < i64::MAX as f64 => Ok(Some(secs.trunc() as i64)),
        _ => Err(serde::de::Error::custom(format!(
            "NumericDate out of range: {number}"
        ))),
    }
}

/// Policy for the optional lifetime gate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LifetimePolicy {
    pub now: i64,
    pub leeway: i64,
}

/// The caller's security context the claims are matched against.
pub(crate) struct Expectations<'a> {
    pub issuer: &'a str,
    pub audience: &'a str,
    pub nonce: &'a str,
    pub lifetime: Option<LifetimePolicy>,
}

/// Runs the claims gates in order: issuer, audience, lifetime, nonce.
pub(crate) fn check_claims(claims: IdTokenClaims, expected: &Expectations<'_>) -> Verdict {
    if claims.issuer() != Some(expected.issuer) {
        warn!(expected = %expected.issuer, actual = ?claims.iss, "Issuer mismatch.");
        return Verdict::RejectedIssuer { actual: claims.iss };
    }

    if !claims.aud.iter().any(|aud| aud == expected.audience) {
        warn!(expected = %expected.audience, actual = ?claims.aud, "Audience mismatch.");
        return Verdict::RejectedAudience { actual: claims.aud };
    }

    if let Some(LifetimePolicy { now, leeway }) = expected.lifetime {
        match claims.exp {
            Some(exp) if now < exp.saturating_add(leeway) => {}
            expires_at => {
                warn!(?expires_at, now, "Token expired.");
                return Verdict::RejectedExpired { expires_at, now };
            }
        }
        if let Some(not_before) = claims.nbf {
            if now.saturating_add(leeway) < not_before {
                warn!(not_before, now, "Token not yet valid.");
                return Verdict::RejectedNotYetValid { not_before, now };
            }
        }
    } else {
        debug!("Lifetime check disabled by caller.");
    }

    // A nonce mismatch is reported like an unverifiable signature: a plain
    // negative outcome, not an error.
    if claims.nonce() != Some(expected.nonce) {
        debug!("Nonce mismatch.");
        return Verdict::RejectedNonceOrKey;
    }

    Verdict::Accepted(claims)
}
