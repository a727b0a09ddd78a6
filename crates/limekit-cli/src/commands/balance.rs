//! `limekit balance`: ETH, LIB and LMT balances of the wallet.

use std::path::PathBuf;
use std::time::Duration;

use limekit_core::config::Config;
use limekit_core::price::{usd_value, PriceFeed};
use limekit_core::types::{Address, U256};
use limekit_core::units::{format_balance, shorten_hex};
use limekit_evm::token::erc20_balance;
use limekit_evm::EvmAdapter;
use rust_decimal::Decimal;
use tracing::warn;

use super::{connect_read_only, load_config, resolve_config_path, CliResult};

struct Balances {
    eth: U256,
    lib: U256,
    lmt: Option<U256>,
}

async fn fetch(adapter: &EvmAdapter, config: &Config, owner: Address) -> CliResult<Balances> {
    let eth = adapter.get_eth_balance(owner).await?;
    let lib = erc20_balance(adapter, config.contracts.lib_token, owner).await?;
    let lmt = match config.contracts.lime_token {
        Some(token) => Some(erc20_balance(adapter, token, owner).await?),
        None => None,
    };
    Ok(Balances { eth, lib, lmt })
}

fn print(owner: Address, balances: &Balances, price: Option<Decimal>) {
    println!("Account: {}", shorten_hex(&owner.to_string(), 4));
    let usd = price
        .and_then(|p| usd_value(balances.eth, p))
        .map(|v| format!(" (${v})"))
        .unwrap_or_default();
    println!("  ETH: {}{usd}", format_balance(balances.eth, 18, 3));
    println!("  LIB: {}", format_balance(balances.lib, 18, 3));
    if let Some(lmt) = balances.lmt {
        println!("  LMT: {}", format_balance(lmt, 18, 3));
    }
}

pub async fn run(config_path: Option<PathBuf>, watch: bool) -> CliResult {
    let config = load_config(&resolve_config_path(config_path)?)?;
    let adapter = connect_read_only(&config)?;
    let owner = adapter.caller();

    let feed = PriceFeed::new(
        config.price_feed.base_url.clone(),
        Duration::from_secs(config.price_feed.interval_secs),
    );

    if !watch {
        let price = match feed.fetch().await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!("ETH price unavailable: {e}");
                None
            }
        };
        print(owner, &fetch(&adapter, &config, owner).await?, price);
        return Ok(());
    }

    let (_feed, mut prices) = feed.spawn();
    loop {
        let balances = fetch(&adapter, &config, owner).await?;
        let price = *prices.borrow_and_update();
        print(owner, &balances, price);

        tokio::select! {
            changed = prices.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}
