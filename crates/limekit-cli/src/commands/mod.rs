//! CLI subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use limekit_core::config::Config;
use limekit_evm::EvmAdapter;
use limekit_signer::{Keystore, LocalSigner};
use tracing::debug;

pub mod balance;
pub mod election;
pub mod init;
pub mod library;
pub mod progress;
pub mod sign_authorization;
pub mod token;

/// Environment variable consulted before prompting for the keystore password.
pub(crate) const PASSWORD_ENV: &str = "LIMEKIT_PASSWORD";

pub(crate) type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub(crate) fn resolve_data_dir(data_dir: Option<PathBuf>) -> CliResult<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }

    let home = dirs::home_dir().ok_or("could not determine home directory")?;
    Ok(home.join(".limekit"))
}

pub(crate) fn resolve_config_path(config: Option<PathBuf>) -> CliResult<PathBuf> {
    match config {
        Some(path) => Ok(path),
        None => Ok(resolve_data_dir(None)?.join("config.yaml")),
    }
}

pub(crate) fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::from_file(path)
        .map_err(|e| format!("failed to load config {}: {e}", path.display()))?;
    debug!(path = %path.display(), rpc = %config.rpc_url, "config loaded");
    Ok(config)
}

/// Reads a password from `env_var`, or prompts on the terminal.
pub(crate) fn read_password(prompt: &str, env_var: &str) -> CliResult<String> {
    if let Ok(password) = std::env::var(env_var) {
        return Ok(password);
    }
    Ok(rpassword::prompt_password(prompt)?)
}

/// Unlocks the default keystore named by the config.
pub(crate) fn unlock_signer(config: &Config) -> CliResult<LocalSigner> {
    let keystore = Keystore::open(&config.keystore_path);
    let entry = keystore.default_entry()?;
    let password = read_password(
        &format!("Password for {}: ", entry.address),
        PASSWORD_ENV,
    )?;
    Ok(keystore.unlock(&entry, &password)?)
}

/// Connects to the node with the wallet key.
pub(crate) fn connect(config: &Config) -> CliResult<Arc<EvmAdapter>> {
    let signer = unlock_signer(config)?;
    let adapter = EvmAdapter::new(
        &config.rpc_url,
        signer.signing_key().clone(),
        config.receipt_poll_interval(),
    )?;
    Ok(Arc::new(adapter))
}

/// Connects without unlocking the keystore. Reads are issued as the
/// default keystore address; writes are not possible.
pub(crate) fn connect_read_only(config: &Config) -> CliResult<Arc<EvmAdapter>> {
    let entry = Keystore::open(&config.keystore_path).default_entry()?;
    let adapter =
        EvmAdapter::read_only(&config.rpc_url, entry.address, config.receipt_poll_interval())?;
    debug!(caller = %entry.address, "read-only connection");
    Ok(Arc::new(adapter))
}
