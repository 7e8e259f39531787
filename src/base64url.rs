// src/base64url.rs

//! Base64URL decoding for token segments and JWK key material.
//!
//! Input is normalised to standard base64 (restore `=` padding, map `-` to
//! `+` and `_` to `/`) and then decoded. Issuers disagree about padding and
//! trailing bits, so both are tolerated.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Decodes a Base64URL string, with or without padding.
pub(crate) fn decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    LENIENT_STANDARD.decode(to_standard(input))
}

/// Encodes bytes as unpadded Base64URL, the form JWKS documents use.
pub(crate) fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

fn to_standard(input: &str) -> String {
    let mut out: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let rem = out.len() % 4;
    if rem != 0 {
        out.push_str(&"===="[rem..]);
    }
    out
}
