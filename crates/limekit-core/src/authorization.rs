//! Off-chain authorization for `wrapWithSignature`.
//!
//! Address A signs a fixed message once; address B then wraps ETH on A's
//! behalf by passing the message hash and the split signature to the
//! contract instead of sending an approval transaction.

use alloy_primitives::keccak256;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{Address, B256};

/// Message signed by the authorizing address unless configured otherwise.
pub const DEFAULT_AUTHORIZATION_MESSAGE: &str = "Yes, I signed the message";

#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("invalid signature hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("signature must be 65 bytes, got {0}")]
    Length(usize),
    #[error("invalid recovery id {0}")]
    RecoveryId(u8),
}

/// Hash the contract expects: `keccak256(abi.encodePacked(message))`.
pub fn message_hash(message: &str) -> B256 {
    keccak256(message.as_bytes())
}

/// An ECDSA signature split into the `(v, r, s)` contract parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSignature {
    /// Recovery id, normalised to 27 or 28.
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl SplitSignature {
    /// Splits a 65-byte `r || s || v` signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthorizationError> {
        if bytes.len() != 65 {
            return Err(AuthorizationError::Length(bytes.len()));
        }
        let v = match bytes[64] {
            v @ (0 | 1) => v + 27,
            v @ (27 | 28) => v,
            other => return Err(AuthorizationError::RecoveryId(other)),
        };
        Ok(Self {
            v,
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
        })
    }

    /// Parses a hex signature, with or without `0x`.
    pub fn from_hex(signature: &str) -> Result<Self, AuthorizationError> {
        let trimmed = signature.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        Self::from_bytes(&hex::decode(stripped)?)
    }

    /// Joined `0x`-prefixed `r || s || v` hex.
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(self.r.as_slice());
        bytes.extend_from_slice(self.s.as_slice());
        bytes.push(self.v);
        format!("0x{}", hex::encode(bytes))
    }
}

/// Everything `wrapWithSignature` needs besides the ETH value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    pub message_hash: B256,
    pub signature: SplitSignature,
    /// Address that produced the signature.
    pub signer: Address,
}

/// Authorization section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationConfig {
    #[serde(default = "default_message")]
    pub message: String,
    /// Hex signature obtained from the signer out of band.
    pub signature: String,
    pub signer: Address,
}

fn default_message() -> String {
    DEFAULT_AUTHORIZATION_MESSAGE.to_string()
}

impl AuthorizationConfig {
    pub fn resolve(&self) -> Result<SignedAuthorization, AuthorizationError> {
        Ok(SignedAuthorization {
            message_hash: message_hash(&self.message),
            signature: SplitSignature::from_hex(&self.signature)?,
            signer: self.signer,
        })
    }
}
