//! Local message signing.
//!
//! Produces EIP-191 `personal_sign` signatures, which is what the library
//! contract's `wrapWithSignature` recovers the signer from.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use limekit_core::authorization::{
    message_hash, AuthorizationError, SignedAuthorization, SplitSignature,
};
use limekit_core::types::{Address, B256};
use sha3::{Digest, Keccak256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("signature recovery failed: {0}")]
    Recovery(String),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
}

/// Derives the Ethereum address of a signing key.
pub fn address_of(key: &SigningKey) -> Address {
    address_of_verifying(key.verifying_key())
}

fn address_of_verifying(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 prefix, hash the 64 coordinate bytes.
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// `keccak256("\x19Ethereum Signed Message:\n" || len || message)`.
pub fn eip191_hash(message: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    hasher.update(message);
    B256::from_slice(&hasher.finalize())
}

/// Recovers the address that produced `signature` over `message`.
pub fn recover_signer(message: &[u8], signature: &SplitSignature) -> Result<Address, SignerError> {
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(signature.r.as_slice());
    rs[32..].copy_from_slice(signature.s.as_slice());
    let sig = Signature::from_slice(&rs).map_err(|e| SignerError::Recovery(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(signature.v.saturating_sub(27))
        .ok_or(AuthorizationError::RecoveryId(signature.v))?;

    let key = VerifyingKey::recover_from_prehash(eip191_hash(message).as_slice(), &sig, recovery_id)
        .map_err(|e| SignerError::Recovery(e.to_string()))?;
    Ok(address_of_verifying(&key))
}

/// A signing key held in memory.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl LocalSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(&key);
        Self { key, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The raw key, for handing to a transaction-signing wallet.
    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Signs `message` with the EIP-191 prefix.
    pub fn sign_message(&self, message: &[u8]) -> Result<SplitSignature, SignerError> {
        let digest = eip191_hash(message);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(recovery_id.to_byte());
        Ok(SplitSignature::from_bytes(&bytes)?)
    }

    /// Signs the hash of `message` as `wrapWithSignature` expects it.
    ///
    /// The 32 hash bytes are what gets signed, not the message text.
    pub fn sign_authorization(&self, message: &str) -> Result<SignedAuthorization, SignerError> {
        let hash = message_hash(message);
        let signature = self.sign_message(hash.as_slice())?;
        Ok(SignedAuthorization {
            message_hash: hash,
            signature,
            signer: self.address,
        })
    }
}
