//! Known chain identifiers and their block explorer links.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Address, TxHash};

/// Chains the contracts have been deployed to at some point.
///
/// Each variant carries its well-known numeric chain ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum SupportedChainId {
    /// Ethereum mainnet
    Mainnet = 1,
    Ropsten = 3,
    Rinkeby = 4,
    Goerli = 5,
    Kovan = 42,
    Sepolia = 11_155_111,
}

impl SupportedChainId {
    /// All supported chain IDs.
    pub const ALL: [SupportedChainId; 6] = [
        Self::Mainnet,
        Self::Ropsten,
        Self::Rinkeby,
        Self::Goerli,
        Self::Kovan,
        Self::Sepolia,
    ];

    /// Returns the numeric chain ID.
    pub const fn as_u64(self) -> u64 {
        self as u64
    }

    /// Human-readable chain name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "Ethereum",
            Self::Ropsten => "Ropsten",
            Self::Rinkeby => "Rinkeby",
            Self::Goerli => "Goerli",
            Self::Kovan => "Kovan",
            Self::Sepolia => "Sepolia",
        }
    }

    /// Subdomain prefix of the chain's Etherscan instance.
    pub const fn etherscan_prefix(self) -> &'static str {
        match self {
            Self::Mainnet => "",
            Self::Ropsten => "ropsten.",
            Self::Rinkeby => "rinkeby.",
            Self::Goerli => "goerli.",
            Self::Kovan => "kovan.",
            Self::Sepolia => "sepolia.",
        }
    }

    /// Etherscan page of a transaction.
    pub fn transaction_url(self, hash: &TxHash) -> String {
        format!("https://{}etherscan.io/tx/{hash}", self.etherscan_prefix())
    }

    /// Etherscan page of an account.
    pub fn account_url(self, address: &Address) -> String {
        format!(
            "https://{}etherscan.io/address/{address}",
            self.etherscan_prefix()
        )
    }
}

impl TryFrom<u64> for SupportedChainId {
    type Error = UnsupportedChainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.as_u64() == value)
            .ok_or(UnsupportedChainError(value))
    }
}

impl From<SupportedChainId> for u64 {
    fn from(chain: SupportedChainId) -> u64 {
        chain.as_u64()
    }
}

impl fmt::Display for SupportedChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u64())
    }
}

/// Error when a chain ID has no known explorer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported chain_id {0}")]
pub struct UnsupportedChainError(pub u64);
