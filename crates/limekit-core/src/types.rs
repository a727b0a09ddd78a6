//! Common types shared across limekit crates.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use alloy_primitives::{Address, B256, U256};

/// Hash identifying a submitted transaction.
pub type TxHash = B256;

/// The part of a mined receipt the screens care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
}

/// A book record as stored by the library contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub name: String,
    /// Copies currently available for borrowing.
    pub copies: u64,
}

impl Book {
    /// The contract returns a zeroed record for unknown ids.
    pub fn exists(&self) -> bool {
        self.id != 0
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "№{} {} (available copies: {})",
            self.id, self.name, self.copies
        )
    }
}

/// Result of one US state, as submitted to the election contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResult {
    pub name: String,
    pub votes_biden: u64,
    pub votes_trump: u64,
    /// Electoral seats of the state.
    pub seats: u8,
}

/// Current leader reported by the election contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Leader {
    #[default]
    Unknown,
    Biden,
    Trump,
}

impl From<u8> for Leader {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Biden,
            2 => Self::Trump,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "Unknown",
            Self::Biden => "Biden",
            Self::Trump => "Trump",
        })
    }
}
