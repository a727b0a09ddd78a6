//! Encrypted wallet keystore.
//!
//! Stores the wallet key as an Ethereum V3 keystore file (scrypt +
//! aes-128-ctr, via `eth-keystore`). Files are named after the lowercase hex
//! address so the directory can be listed without decrypting anything.

use std::path::{Path, PathBuf};

use k256::ecdsa::SigningKey;
use limekit_core::types::Address;
use thiserror::Error;
use tracing::debug;

use crate::signer::{address_of, LocalSigner};

/// Errors arising from keystore operations.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("keystore crypto error: {0}")]
    Keystore(String),

    #[error("invalid private key")]
    InvalidKey,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no keystore found in {0}")]
    Empty(PathBuf),

    #[error("keystore {path} holds the key of {found}, not {expected}")]
    AddressMismatch {
        path: PathBuf,
        expected: Address,
        found: Address,
    },
}

/// Result alias for keystore operations.
pub type Result<T> = std::result::Result<T, KeystoreError>;

/// One keystore file and the address it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreEntry {
    pub address: Address,
    pub path: PathBuf,
}

/// A directory of keystore files.
#[derive(Debug, Clone)]
pub struct Keystore {
    dir: PathBuf,
}

impl Keystore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates a keystore file for a freshly generated key.
    pub fn generate(&self, password: &str) -> Result<KeystoreEntry> {
        let key = SigningKey::random(&mut rand::thread_rng());
        self.import(password, &key.to_bytes())
    }

    /// Encrypts an existing 32-byte private key.
    pub fn import(&self, password: &str, private_key: &[u8]) -> Result<KeystoreEntry> {
        let key = SigningKey::from_slice(private_key).map_err(|_| KeystoreError::InvalidKey)?;
        let address = address_of(&key);

        std::fs::create_dir_all(&self.dir)?;
        let name = file_name(&address);
        let mut rng = rand::thread_rng();
        eth_keystore::encrypt_key(&self.dir, &mut rng, private_key, password, Some(&name))
            .map_err(|e| KeystoreError::Keystore(e.to_string()))?;

        let path = self.dir.join(name);
        debug!(%address, path = %path.display(), "keystore written");
        Ok(KeystoreEntry { address, path })
    }

    /// All keystore files in the directory, sorted by address.
    ///
    /// Files whose address cannot be determined are skipped.
    pub fn entries(&self) -> Result<Vec<KeystoreEntry>> {
        let mut entries = Vec::new();
        if !self.dir.exists() {
            return Ok(entries);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(address) = address_from_file_name(&path).or_else(|| address_from_json(&path))
            {
                entries.push(KeystoreEntry { address, path });
            }
        }
        entries.sort_by_key(|e| e.address);
        Ok(entries)
    }

    /// The keystore to use when none is named: the lowest address.
    pub fn default_entry(&self) -> Result<KeystoreEntry> {
        self.entries()?
            .into_iter()
            .next()
            .ok_or_else(|| KeystoreError::Empty(self.dir.clone()))
    }

    /// Decrypts `entry` and checks it holds the key of `entry.address`.
    pub fn unlock(&self, entry: &KeystoreEntry, password: &str) -> Result<LocalSigner> {
        let secret = eth_keystore::decrypt_key(&entry.path, password)
            .map_err(|e| KeystoreError::Keystore(e.to_string()))?;
        let key = SigningKey::from_slice(&secret).map_err(|_| KeystoreError::InvalidKey)?;

        let found = address_of(&key);
        if found != entry.address {
            return Err(KeystoreError::AddressMismatch {
                path: entry.path.clone(),
                expected: entry.address,
                found,
            });
        }
        Ok(LocalSigner::new(key))
    }
}

fn file_name(address: &Address) -> String {
    hex::encode(address.as_slice())
}

fn parse_address(raw: &str) -> Option<Address> {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(stripped).ok()?;
    (bytes.len() == 20).then(|| Address::from_slice(&bytes))
}

fn address_from_file_name(path: &Path) -> Option<Address> {
    parse_address(path.file_name()?.to_str()?)
}

/// Keystores written by other tools (geth) carry an `address` field.
fn address_from_json(path: &Path) -> Option<Address> {
    let data = std::fs::read_to_string(path).ok()?;
    let json: serde_json::Value = serde_json::from_str(&data).ok()?;
    parse_address(json.get("address")?.as_str()?)
}
