//! Governance configuration.
//!
//! Loaded by the embedding environment (TOML file or defaults) and handed to
//! the bootstrap wiring. The core never reads configuration ambiently.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Governance parameters.
///
/// Block-denominated fields (`voting_delay`, `voting_period`) count ledger
/// sequence indices; time-denominated fields (`min_delay`, `grace_period`)
/// count seconds of timelock clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Token name
    pub token_name: String,
    /// Token symbol
    pub token_symbol: String,
    /// Initial token supply, credited to the deployer at bootstrap.
    /// Kept at 64 bits so it fits a TOML integer; ledger balances are
    /// wider to keep checkpoint sums from saturating.
    pub initial_supply: u64,
    /// Blocks between proposal creation and voting start
    pub voting_delay: u64,
    /// Blocks the voting window stays open
    pub voting_period: u64,
    /// Quorum as a percentage (0-100) of historical total supply
    pub quorum_percent: u8,
    /// Minimum timelock delay in seconds between queue and execute
    pub min_delay: u64,
    /// Seconds a queued proposal stays executable before it expires
    pub grace_period: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            token_name: "Covenant Token".to_string(),
            token_symbol: "COV".to_string(),
            initial_supply: 1_000_000,
            voting_delay: 1,
            voting_period: 50_400, // ~1 week at 12s blocks
            quorum_percent: 4,
            min_delay: 3_600,        // 1 hour
            grace_period: 1_209_600, // 14 days
        }
    }
}

impl GovernanceConfig {
    /// Fast parameters for local testing: short window, short delay.
    pub fn local() -> Self {
        Self {
            voting_period: 50,
            min_delay: 60,
            grace_period: 3_600,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, TypesError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| TypesError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TypesError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TypesError::ConfigIo(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.quorum_percent > 100 {
            return Err(TypesError::InvalidConfig(format!(
                "quorum_percent must be 0-100, got {}",
                self.quorum_percent
            )));
        }
        if self.voting_delay == 0 {
            // Snapshot must be strictly historical once voting opens
            return Err(TypesError::InvalidConfig(
                "voting_delay must be at least 1 block".to_string(),
            ));
        }
        if self.voting_period == 0 {
            return Err(TypesError::InvalidConfig(
                "voting_period must be at least 1 block".to_string(),
            ));
        }
        if self.min_delay == 0 {
            return Err(TypesError::InvalidConfig(
                "min_delay must be at least 1 second".to_string(),
            ));
        }
        if self.initial_supply == 0 {
            return Err(TypesError::InvalidConfig(
                "initial_supply must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GovernanceConfig::default().validate().is_ok());
        assert!(GovernanceConfig::local().validate().is_ok());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = GovernanceConfig::local();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("token_name"));

        let parsed = GovernanceConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            token_name = "Small Council Token"
            token_symbol = "SCT"
            initial_supply = 10000
            voting_delay = 1
            voting_period = 10
            quorum_percent = 4
            min_delay = 3600
            grace_period = 86400
        "#;

        let config = GovernanceConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.token_symbol, "SCT");
        assert_eq!(config.voting_period, 10);
    }

    #[test]
    fn test_config_rejects_bad_quorum() {
        let mut config = GovernanceConfig::default();
        config.quorum_percent = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_zero_voting_delay() {
        let mut config = GovernanceConfig::default();
        config.voting_delay = 0;
        assert!(config.validate().is_err());
    }
}
