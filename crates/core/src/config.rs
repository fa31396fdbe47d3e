//! Chain configuration shared by transaction builders.

use crate::asset::ShardId;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the network id.
pub const NETWORK_ID_ENV: &str = "ASSETKIT_NETWORK_ID";

/// Environment variable overriding the default shard.
pub const SHARD_ID_ENV: &str = "ASSETKIT_SHARD_ID";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid network id {0:?}: expected two lowercase ascii characters")]
    InvalidNetworkId(String),
    #[error("invalid shard id {0:?}")]
    InvalidShardId(String),
}

/// Configuration for building transactions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainConfig {
    /// Two-character network identifier, also the address prefix.
    pub network_id: String,
    /// Shard new asset schemes are created on.
    pub shard_id: ShardId,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network_id: "tc".to_string(),
            shard_id: 0,
        }
    }
}

impl ChainConfig {
    /// Create a configuration for the given network on shard 0.
    pub fn new(network_id: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            network_id: network_id.into(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from the environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(network_id) = lookup(NETWORK_ID_ENV) {
            config.network_id = network_id;
        }
        if let Some(shard_id) = lookup(SHARD_ID_ENV) {
            config.shard_id = shard_id
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidShardId(shard_id.clone()))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the network id is two lowercase ascii letters or digits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.network_id.len() == 2
            && self
                .network_id
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidNetworkId(self.network_id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.network_id, "tc");
        assert_eq!(config.shard_id, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config =
            ChainConfig::from_lookup(lookup(&[(NETWORK_ID_ENV, "cc"), (SHARD_ID_ENV, " 3 ")]))
                .unwrap();
        assert_eq!(config.network_id, "cc");
        assert_eq!(config.shard_id, 3);
    }

    #[test]
    fn test_from_lookup_defaults() {
        assert_eq!(ChainConfig::from_lookup(lookup(&[])).unwrap(), ChainConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ChainConfig::from_lookup(lookup(&[(SHARD_ID_ENV, "70000")])),
            Err(ConfigError::InvalidShardId(_))
        ));
        assert!(matches!(
            ChainConfig::new("TCX"),
            Err(ConfigError::InvalidNetworkId(_))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ChainConfig = serde_json::from_str(r#"{ "shardId": 2 }"#).unwrap();
        assert_eq!(config.network_id, "tc");
        assert_eq!(config.shard_id, 2);
    }
}
