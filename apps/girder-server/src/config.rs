//! Server configuration module.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! # Seed the built-in plan catalog at startup (enabled by default)
//! GIRDER_SEED_PLANS=true
//!
//! # Per-request tracing of the HTTP layer (enabled by default)
//! GIRDER_REQUEST_LOG=true
//! ```

use std::env;
use thiserror::Error;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Whether `serve` seeds the plan catalog before accepting requests.
    pub seed_plans_on_start: bool,
    /// Whether the HTTP trace layer is attached.
    pub request_log: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            seed_plans_on_start: true,
            request_log: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid boolean for {0}: {1}. Expected true/false or 1/0")]
    InvalidBool(&'static str, String),
}

fn env_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidBool(name, value)),
        },
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            seed_plans_on_start: env_bool("GIRDER_SEED_PLANS", true)?,
            request_log: env_bool("GIRDER_REQUEST_LOG", true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert!(config.seed_plans_on_start);
        assert!(config.request_log);
    }

    #[test]
    fn test_env_bool_unset_uses_default() {
        assert!(env_bool("GIRDER_TEST_UNSET_FLAG", true).unwrap());
        assert!(!env_bool("GIRDER_TEST_UNSET_FLAG", false).unwrap());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidBool("GIRDER_SEED_PLANS", "maybe".to_string());
        assert!(err.to_string().contains("GIRDER_SEED_PLANS"));
        assert!(err.to_string().contains("maybe"));
    }
}
