// src/validator/decode.rs

use super::claims::IdTokenClaims;
use crate::base64url;
use crate::error::{Result, TokenValidatorError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The JOSE header of a compact token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct JoseHeader {
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
}

/// A compact token split and decoded, but not yet trusted.
#[derive(Debug)]
pub(crate) struct DecodedToken<'a> {
    pub header: JoseHeader,
    pub claims: IdTokenClaims,
    /// `header.payload`, the bytes the signature covers.
    pub signing_input: &'a str,
    pub signature: Vec<u8>,
}

/// Splits `header.payload.signature` and decodes each segment.
pub(crate) fn decode_token(token: &str, max_length: usize) -> Result<DecodedToken<'_>> {
    if token.len() > max_length {
        return Err(TokenValidatorError::malformed(format!(
            "token is {} bytes, limit is {max_length}",
            token.len()
        )));
    }

    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments[..] else {
        return Err(TokenValidatorError::malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(TokenValidatorError::malformed("empty segment"));
    }

    Ok(DecodedToken {
        header: decode_json(header, "header")?,
        claims: decode_json(payload, "payload")?,
        signing_input: &token[..header.len() + 1 + payload.len()],
        signature: base64url::decode(signature)
            .map_err(|e| TokenValidatorError::malformed(format!("signature: {e}")))?,
    })
}

fn decode_json<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T> {
    let bytes = base64url::decode(segment)
        .map_err(|e| TokenValidatorError::malformed(format!("{name}: {e}")))?;
    // Only a JSON object is a valid header or claims set; serde's derived
    // struct visitor would otherwise accept a positional array.
    let object: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| TokenValidatorError::malformed(format!("{name}: {e}")))?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| TokenValidatorError::malformed(format!("{name}: {e}")))
}
