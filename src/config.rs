// src/config.rs

use crate::error::{Result, TokenValidatorError};
use serde::Deserialize;
use std::time::Duration;

/// Default upper bound on the length of a compact token, in bytes.
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 16 * 1024;

/// Settings that tune how a `Validator` checks tokens.
///
/// The expected issuer, audience and nonce are per-call inputs, so they do
/// not live here. This struct only holds policy that is the same for every
/// call, and it can be deserialized from a config file:
///
/// ```yaml
/// leeway_seconds: 30
/// max_token_length: 8192
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// The tolerance for clock skew when checking `exp` and `nbf`.
    /// Defaults to zero: the current time must be strictly before `exp`.
    #[serde(rename = "leeway_seconds", with = "duration_secs")]
    pub leeway: Duration,
    /// Tokens longer than this are rejected as malformed before decoding.
    pub max_token_length: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            leeway: Duration::ZERO,
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
        }
    }
}

impl ValidatorConfig {
    /// Checks invariants that `Deserialize` cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.max_token_length == 0 {
            return Err(TokenValidatorError::InvalidConfiguration(
                "max_token_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A builder for creating a `ValidatorConfig` instance.
#[derive(Default)]
pub struct ConfigBuilder {
    leeway: Option<Duration>,
    max_token_length: Option<usize>,
}

impl ConfigBuilder {
    /// Creates a new `ConfigBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock skew tolerance. Defaults to zero.
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.leeway = Some(leeway);
        self
    }

    /// Sets the maximum accepted token length in bytes.
    pub fn max_token_length(mut self, max: usize) -> Self {
        self.max_token_length = Some(max);
        self
    }

    /// Consumes the builder and returns a `ValidatorConfig`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `max_token_length` is zero.
    pub fn build(self) -> Result<ValidatorConfig> {
        let defaults = ValidatorConfig::default();
        let config = ValidatorConfig {
            leeway: self.leeway.unwrap_or(defaults.leeway),
            max_token_length: self.max_token_length.unwrap_or(defaults.max_token_length),
        };
        config.validate()?;
        Ok(config)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
