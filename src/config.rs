use config::{Config, File};
pub use config::ConfigError;
use serde::Deserialize;

use crate::kandel::types::MarketSpec;

/// Main configuration struct
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Network configuration (RPC endpoint, chain)
    pub network: NetworkConfig,
    /// Market configuration (tokens, decimals, core contracts)
    pub market: MarketConfig,
    /// Defaults applied to new grid deployments
    #[serde(default)]
    pub deploy: DeployConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    pub chain_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct MarketConfig {
    /// Base token symbol (e.g. "WETH")
    pub base_symbol: String,
    /// Quote token symbol (e.g. "USDC")
    pub quote_symbol: String,
    pub base_decimals: u32,
    pub quote_decimals: u32,
    /// Base token contract address (hex string)
    pub base_token: String,
    /// Quote token contract address (hex string)
    pub quote_token: String,
    /// Core exchange contract address
    pub mangrove: String,
    /// Read-only lens contract address
    pub reader: String,
}

impl MarketConfig {
    pub fn spec(&self) -> MarketSpec {
        MarketSpec {
            base_decimals: self.base_decimals,
            quote_decimals: self.quote_decimals,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_price_points")]
    pub price_points: u32,
    #[serde(default = "default_step_size")]
    pub step_size: u32,
    /// Gas each offer reserves for its maker callback
    #[serde(default = "default_gasreq")]
    pub gasreq: u64,
    /// Registry file path
    #[serde(default = "default_registry_path")]
    pub registry_path: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            price_points: default_price_points(),
            step_size: default_step_size(),
            gasreq: default_gasreq(),
            registry_path: default_registry_path(),
        }
    }
}

fn default_price_points() -> u32 {
    10
}

fn default_step_size() -> u32 {
    1
}

fn default_gasreq() -> u64 {
    crate::consts::DEFAULT_GAS_REQUIREMENT
}

fn default_registry_path() -> String {
    "deployments.json".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct LogConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from a configuration file
    pub fn new(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Add configuration file
            .add_source(File::with_name(config_path))
            // Add environment variables (overrides file)
            // e.g. APP_NETWORK__RPC_URL=...
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
