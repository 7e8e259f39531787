// src/validator/signature.rs

use super::decode::JoseHeader;
use crate::base64url;
use crate::keys::SigningKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::{BigUint, RsaPublicKey};
use sha2::Sha256;
use tracing::{debug, warn};

/// The only algorithm this validator verifies.
const RS256: &str = "RS256";

/// Largest RSA modulus accepted from a key set, in bits.
const MAX_MODULUS_BITS: usize = 8192;

/// Finds the first key in `keys` whose RS256 signature over `signing_input`
/// matches `signature`.
///
/// When the header names a `kid` that appears in the set, only keys with that
/// `kid` are tried. Otherwise every key is tried in order.
pub(crate) fn find_verifying_key<'k>(
    header: &JoseHeader,
    signing_input: &[u8],
    signature: &[u8],
    keys: &'k [SigningKey],
) -> Option<&'k SigningKey> {
    if let Some(alg) = header.alg.as_deref() {
        if alg != RS256 {
            warn!(alg, "Token is not signed with RS256; no key can verify it.");
            return None;
        }
    }

    let signature = match Signature::try_from(signature) {
        Ok(signature) => signature,
        Err(e) => {
            debug!("Signature bytes rejected: {}", e);
            return None;
        }
    };

    let kid = header.kid.as_deref();
    let kid_matches = kid.is_some() && keys.iter().any(|key| key.kid() == kid);
    if kid.is_some() && !kid_matches {
        debug!(?kid, "No key matches the token's kid; trying all keys.");
    }

    keys.iter()
        .filter(|key| !kid_matches || key.kid() == kid)
        .find(|key| {
            let Some(public_key) = verifying_key(key) else {
                return false;
            };
            let verified = public_key.verify(signing_input, &signature).is_ok();
            debug!(kid = ?key.kid(), verified, "Tried signing key.");
            verified
        })
}

/// Rebuilds an RSA public key from the key's (n, e) pair.
/// Returns `None` if the material is unusable.
fn verifying_key(key: &SigningKey) -> Option<VerifyingKey<Sha256>> {
    let components = base64url::decode(key.modulus())
        .and_then(|n| base64url::decode(key.exponent()).map(|e| (n, e)));
    let (n, e) = match components {
        Ok(components) => components,
        Err(e) => {
            warn!(kid = ?key.kid(), "Signing key material is not valid base64: {}", e);
            return None;
        }
    };

    match RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(&n),
        BigUint::from_bytes_be(&e),
        MAX_MODULUS_BITS,
    ) {
        Ok(public_key) => Some(VerifyingKey::<Sha256>::new(public_key)),
        Err(e) => {
            warn!(kid = ?key.kid(), "Signing key is not a usable RSA public key: {}", e);
            None
        }
    }
}
