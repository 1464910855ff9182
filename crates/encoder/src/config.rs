//! Configuration loading and validation for the encoder.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::key::{KeyError, SecretKey, KEY_HEX_LEN};

/// Validated encoder configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// 64-character hex AES-256 key. **Required.** Supply it from a secret
    /// store; never commit it.
    pub secret_key_hex: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parse the configured key.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if the key is not 32 bytes of hex.
    pub fn secret_key(&self) -> Result<SecretKey, KeyError> {
        SecretKey::from_hex(&self.secret_key_hex)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        let key = self.secret_key_hex.trim();
        if key.is_empty() {
            anyhow::bail!("SECRET_KEY_HEX is required and must not be empty");
        }
        if key.len() != KEY_HEX_LEN {
            anyhow::bail!(
                "SECRET_KEY_HEX must be {KEY_HEX_LEN} hex characters, got {}",
                key.len()
            );
        }
        self.secret_key()
            .map(drop)
            .context("SECRET_KEY_HEX is not a valid key")?;
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key_hex", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::tests::TEST_KEY_HEX;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        config::Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn loads_from_environment() {
        let cfg = Config::from_environment(env(&[("SECRET_KEY_HEX", TEST_KEY_HEX)])).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.secret_key().unwrap().as_bytes()[0], 0x01);
    }

    #[test]
    fn missing_key_is_rejected() {
        assert!(Config::from_environment(env(&[("LOG_LEVEL", "debug")])).is_err());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let cfg = Config {
            secret_key_hex: "  ".into(),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_key() {
        let cfg = Config {
            secret_key_hex: "0123456789abcdef".into(),
            log_level: default_log_level(),
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("64 hex characters"));
    }

    #[test]
    fn validate_rejects_non_hex_key() {
        let cfg = Config {
            secret_key_hex: "g".repeat(KEY_HEX_LEN),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = Config {
            secret_key_hex: TEST_KEY_HEX.into(),
            log_level: default_log_level(),
        };
        let printed = format!("{cfg:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(TEST_KEY_HEX));
    }
}
