//! YAML configuration.
//!
//! Loads `config.yaml` into [`Config`]: the RPC endpoint, the contract
//! addresses for each screen and the tuning knobs of the lifecycle.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::authorization::AuthorizationConfig;
use crate::chain::SupportedChainId;
use crate::price::DEFAULT_PRICE_FEED_URL;
use crate::types::{Address, U256};

/// Errors from config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Deployed contract addresses.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractAddresses {
    /// Library contract; also hosts the ETH <-> LIB wrap functions.
    pub library: Address,
    /// LIB ERC-20 token minted by the library.
    pub lib_token: Address,
    /// US election contract.
    pub election: Address,
    /// LimeToken (LMT), only used for balance display.
    #[serde(default)]
    pub lime_token: Option<Address>,
}

/// Price feed section.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceFeedConfig {
    #[serde(default = "default_price_feed_url")]
    pub base_url: String,
    #[serde(default = "default_price_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_price_feed_url(),
            interval_secs: default_price_interval_secs(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the node.
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Directory holding the encrypted wallet keystore.
    pub keystore_path: PathBuf,
    pub contracts: ContractAddresses,
    /// How often to poll for a transaction receipt.
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_interval_ms: u64,
    /// Delay before the election screen checks a typed state name.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum LIB allowance granted when an unwrap needs approval (raw units).
    #[serde(default = "default_approval_amount")]
    pub approval_amount: String,
    #[serde(default)]
    pub price_feed: PriceFeedConfig,
    /// Pre-signed authorization for `wrapWithSignature`.
    #[serde(default)]
    pub authorization: Option<AuthorizationConfig>,
    /// Show desktop notifications for election events.
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_chain_id() -> u64 {
    SupportedChainId::Sepolia.as_u64()
}

fn default_receipt_poll_ms() -> u64 {
    1_000
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_approval_amount() -> String {
    "500000000000000".to_string()
}

fn default_price_feed_url() -> String {
    DEFAULT_PRICE_FEED_URL.to_string()
}

fn default_price_interval_secs() -> u64 {
    60
}

fn default_notifications() -> bool {
    true
}

impl Config {
    /// Parse and validate a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc_url must not be empty".into()));
        }
        if self.receipt_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "receipt_poll_interval_ms must be positive".into(),
            ));
        }
        if self.price_feed.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "price_feed.interval_secs must be positive".into(),
            ));
        }
        self.approval_amount()?;
        if let Some(auth) = &self.authorization {
            auth.resolve()
                .map_err(|e| ConfigError::Invalid(format!("authorization: {e}")))?;
        }
        Ok(())
    }

    pub fn approval_amount(&self) -> Result<U256, ConfigError> {
        self.approval_amount
            .trim()
            .parse::<U256>()
            .map_err(|e| ConfigError::Invalid(format!("approval_amount: {e}")))
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Explorer for transaction links, if the chain has one.
    pub fn explorer(&self) -> Option<SupportedChainId> {
        SupportedChainId::try_from(self.chain_id).ok()
    }
}
