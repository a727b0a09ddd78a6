//! # limekit
//!
//! Client for the LimeAcademy library, LIB token and US election contracts.
//!
//! This crate re-exports the workspace members: screen controllers and the
//! transaction lifecycle ([`limekit_core`]), the JSON-RPC contract gateways
//! ([`limekit_evm`]) and the keystore/signing layer ([`limekit_signer`]).

pub use limekit_core;
pub use limekit_evm;
pub use limekit_signer;

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
