// src/keys.rs

use crate::base64url;
use crate::error::Result;
use crate::model::{JsonWebKey, JsonWebKeySet};
use tracing::debug;

/// An RSA public key as published in a JWKS document.
///
/// The modulus and exponent stay in their Base64URL text form. They are only
/// decoded when a token is verified, so a key with broken material is simply
/// unusable for that call instead of poisoning the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    kid: Option<String>,
    modulus: String,
    exponent: String,
}

impl SigningKey {
    /// Creates a key from Base64URL-encoded modulus (`n`) and exponent (`e`).
    pub fn rsa(modulus: impl Into<String>, exponent: impl Into<String>) -> Self {
        Self {
            kid: None,
            modulus: modulus.into(),
            exponent: exponent.into(),
        }
    }

    /// Creates a key from big-endian modulus and exponent bytes.
    pub fn from_rsa_components(modulus: &[u8], exponent: &[u8]) -> Self {
        Self::rsa(base64url::encode(modulus), base64url::encode(exponent))
    }

    /// Attaches a key identifier.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn modulus(&self) -> &str {
        &self.modulus
    }

    pub fn exponent(&self) -> &str {
        &self.exponent
    }

    /// Converts a JWK into a signing key.
    ///
    /// Returns `None` for keys that can never verify an RS256 signature:
    /// non-RSA keys, encryption keys and RSA keys without `n` or `e`.
    pub fn from_jwk(jwk: &JsonWebKey) -> Option<Self> {
        if jwk.kty != "RSA" {
            debug!(kid = ?jwk.kid, kty = %jwk.kty, "Skipping non-RSA JWK.");
            return None;
        }
        if matches!(jwk.use_purpose.as_deref(), Some(purpose) if purpose != "sig") {
            debug!(kid = ?jwk.kid, "Skipping JWK not intended for signatures.");
            return None;
        }
        let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
            debug!(kid = ?jwk.kid, "Skipping RSA JWK without 'n' or 'e'.");
            return None;
        };
        let key = Self::rsa(n, e);
        Some(match &jwk.kid {
            Some(kid) => key.with_kid(kid.as_str()),
            None => key,
        })
    }
}

/// The read-only capability the validator needs from whatever owns the
/// issuer's keys (a discovery/JWKS cache, a static list, a test fixture).
pub trait KeySetProvider {
    /// The keys currently trusted for signature verification, in order.
    fn signing_keys(&self) -> &[SigningKey];
}

/// An ordered, immutable collection of signing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<SigningKey>,
}

impl KeySet {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }

    /// Parses a JWKS document body into a key set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeySet` if the body is not a JWKS document.
    pub fn from_jwks_json(body: &str) -> Result<Self> {
        let jwks: JsonWebKeySet = serde_json::from_str(body)?;
        Ok(Self::from(jwks))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SigningKey> {
        self.keys.iter()
    }
}

impl From<JsonWebKeySet> for KeySet {
    fn from(jwks: JsonWebKeySet) -> Self {
        let keys: Vec<SigningKey> = jwks.keys.iter().filter_map(SigningKey::from_jwk).collect();
        debug!(
            total = jwks.keys.len(),
            usable = keys.len(),
            "Built signing key set from JWKS."
        );
        Self { keys }
    }
}

impl FromIterator<SigningKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = SigningKey>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl KeySetProvider for KeySet {
    fn signing_keys(&self) -> &[SigningKey] {
        &self.keys
    }
}

impl KeySetProvider for Vec<SigningKey> {
    fn signing_keys(&self) -> &[SigningKey] {
        self
    }
}
