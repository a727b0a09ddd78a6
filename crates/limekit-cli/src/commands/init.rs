//! `limekit init`: Create the data directory, wallet keystore and config.

use std::path::{Path, PathBuf};

use limekit_signer::Keystore;

use super::{read_password, resolve_data_dir, CliResult, PASSWORD_ENV};

const MIN_PASSWORD_LEN: usize = 8;

pub fn run(data_dir: Option<PathBuf>, private_key_file: Option<PathBuf>) -> CliResult {
    let data_dir = resolve_data_dir(data_dir)?;
    let keystore_dir = data_dir.join("keystore");
    let config_path = data_dir.join("config.yaml");
    std::fs::create_dir_all(&data_dir)?;

    let keystore = Keystore::open(&keystore_dir);
    if let Ok(existing) = keystore.default_entry() {
        if private_key_file.is_none() {
            println!("Keystore already present for {}", existing.address);
            write_config_if_absent(&config_path, &keystore_dir)?;
            return Ok(());
        }
    }

    let password = new_password()?;
    let entry = match private_key_file {
        Some(path) => {
            let key = read_private_key(&path)?;
            keystore.import(&password, &key)?
        }
        None => keystore.generate(&password)?,
    };
    println!("✅ Wallet {} stored in {}", entry.address, entry.path.display());

    write_config_if_absent(&config_path, &keystore_dir)?;
    Ok(())
}

fn new_password() -> CliResult<String> {
    let password = read_password("New keystore password: ", PASSWORD_ENV)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!("password must be at least {MIN_PASSWORD_LEN} characters").into());
    }
    if std::env::var(PASSWORD_ENV).is_err() {
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if confirm != password {
            return Err("passwords do not match".into());
        }
    }
    Ok(password)
}

fn read_private_key(path: &Path) -> CliResult<Vec<u8>> {
    let raw = std::fs::read_to_string(path)?;
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let key = hex::decode(stripped).map_err(|e| format!("private key is not hex: {e}"))?;
    if key.len() != 32 {
        return Err(format!("private key must be 32 bytes, got {}", key.len()).into());
    }
    Ok(key)
}

fn write_config_if_absent(path: &Path, keystore_dir: &Path) -> CliResult {
    if path.exists() {
        println!("Config left unchanged at {}", path.display());
        return Ok(());
    }
    std::fs::write(path, config_template(keystore_dir))?;
    println!("📝 Config written to {}", path.display());
    println!("   Set rpc_url and contracts.lib_token before use.");
    Ok(())
}

fn config_template(keystore_dir: &Path) -> String {
    format!(
        r#"rpc_url: "https://sepolia.infura.io/v3/YOUR_PROJECT_ID"
chain_id: 11155111
keystore_path: "{keystore}"

contracts:
  library: "0x8487cfb7E0F37eD820EB8a0030Fc395CEC588CA3"
  lib_token: "0x0000000000000000000000000000000000000000"
  election: "0x11f86B655DEf9dEf1CFFa683c5629eB60B5ce305"
  # lime_token: "0x..."

receipt_poll_interval_ms: 1000
debounce_ms: 500
approval_amount: "500000000000000"
notifications: true

price_feed:
  base_url: "https://production.api.coindesk.com/v2"
  interval_secs: 60

# Output of `limekit sign-authorization` run by the authorizing wallet.
# authorization:
#   message: "Yes, I signed the message"
#   signature: "0x..."
#   signer: "0x..."
"#,
        keystore = keystore_dir.display()
    )
}
