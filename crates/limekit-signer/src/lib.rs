//! # limekit-signer
//!
//! Encrypted wallet keystore and EIP-191 message signing.

pub mod keystore;
pub mod signer;

pub use keystore::{Keystore, KeystoreEntry, KeystoreError};
pub use signer::{LocalSigner, SignerError};
