//! Simulation configuration.
//!
//! Loaded from `settla.toml`; command-line flags override file values.

use serde::{Deserialize, Serialize};
use settla_types::{GenesisConfig, U256};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "settla.toml";

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Chain id bound into every signature
    pub chain_id: u64,
    /// Starting balance of each simulated client
    pub genesis_balance: U256,
    /// Price per unit of gas
    pub gas_price: U256,
    /// Log filter directive (`RUST_LOG` wins when set)
    pub log_level: String,
    /// Emit logs as JSON
    pub json_logs: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            chain_id: GenesisConfig::DEVNET_CHAIN_ID,
            genesis_balance: U256::from(10_000_000u64),
            gas_price: U256::ONE,
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: SimulationConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e))?;
        Ok(())
    }

    /// Load `path` if given, else `settla.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate configuration.
    ///
    /// A zero gas price is allowed: transfers are then free.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chain_id == 0 {
            anyhow::bail!("Chain ID cannot be 0");
        }

        if EnvFilter::try_new(&self.log_level).is_err() {
            anyhow::bail!("Invalid log level '{}'", self.log_level);
        }

        let supply = self.genesis_balance.checked_add(&self.genesis_balance);
        if supply.is_none() {
            anyhow::bail!("Genesis balance {} overflows total supply", self.genesis_balance);
        }

        Ok(())
    }
}
