//! Validates an ID Token from the command line.
//!
//! ```text
//! cargo run --example validate_id_token -- demos/validator.yaml <id_token> <nonce>
//! ```
//!
//! Set `RUST_LOG=oidc_token_validator=debug` to watch each validation stage.

use oidc_token_validator::prelude::*;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct DemoConfig {
    issuer: String,
    audience: String,
    /// A JWKS document saved from the issuer's `jwks_uri`.
    jwks_path: PathBuf,
    #[serde(default = "default_check_lifetime")]
    check_lifetime: bool,
    #[serde(default)]
    validator: ValidatorConfig,
}

fn default_check_lifetime() -> bool {
    true
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(token), Some(nonce)) = (args.next(), args.next(), args.next()) else {
        eprintln!("usage: validate_id_token <config.yaml> <id_token> <nonce>");
        std::process::exit(2);
    };

    let config_str = fs::read_to_string(&config_path)?;
    let config: DemoConfig = serde_yaml::from_str(&config_str)?;
    config.validator.validate()?;

    let keys = KeySet::from_jwks_json(&fs::read_to_string(&config.jwks_path)?)?;
    println!("Loaded {} signing key(s) from {}", keys.len(), config.jwks_path.display());

    let validator = Validator::new(config.validator);
    let request = ValidationRequest::new()
        .token(&token)
        .issuer(&config.issuer)
        .audience(&config.audience)
        .nonce(&nonce)
        .key_set(&keys)
        .check_lifetime(config.check_lifetime);

    match validator.evaluate(&request)? {
        Verdict::Accepted(claims) => {
            println!("Token accepted for sub: {:?}", claims.subject());
        }
        Verdict::RejectedIssuer { actual } => println!("Rejected: issuer {actual:?}"),
        Verdict::RejectedAudience { actual } => println!("Rejected: audience {actual:?}"),
        Verdict::RejectedExpired { expires_at, now } => {
            println!("Rejected: expired at {expires_at:?}, now {now}")
        }
        Verdict::RejectedNotYetValid { not_before, now } => {
            println!("Rejected: not valid before {not_before}, now {now}")
        }
        Verdict::RejectedNonceOrKey => println!("Rejected: no trusted key verified the token, or nonce mismatch"),
    }
    Ok(())
}
