//! # limekit-evm
//!
//! Contract gateways over an EVM JSON-RPC endpoint.
//!
//! ## Modules
//!
//! - [`abi`]: Contract ABIs using alloy's `sol!` macro
//! - [`adapter`]: JSON-RPC adapter: typed reads, signed writes, receipt polling
//! - [`library`], [`token`], [`election`]: One gateway per contract
//! - [`events`]: Election event subscription

pub mod abi;
pub mod adapter;
pub mod election;
pub mod events;
pub mod library;
pub mod token;

pub use adapter::{EvmAdapter, EvmAdapterError};
pub use election::ElectionContract;
pub use library::LibraryContract;
pub use token::TokenContract;

// Re-export alloy primitives used in the public API.
pub use alloy::primitives::{Address, U256};
