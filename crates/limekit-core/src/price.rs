//! ETH/USD price feed.
//!
//! Polls the CoinDesk OHLC endpoint on a fixed interval. A failed poll is
//! logged and the last known price stays published.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::subscription::Subscription;
use crate::types::U256;
use crate::units;

/// Base URL of the CoinDesk price API.
pub const DEFAULT_PRICE_FEED_URL: &str = "https://production.api.coindesk.com/v2";

/// Index of the close price in an OHLC entry `[timestamp, open, high, low, close]`.
const CLOSE_INDEX: usize = 4;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("price endpoint answered with status {0}")]
    Status(u16),
    #[error("unexpected price payload: {0}")]
    Format(String),
}

/// Client for the price endpoint.
#[derive(Debug, Clone)]
pub struct PriceFeed {
    client: reqwest::Client,
    base_url: String,
    interval: Duration,
}

impl PriceFeed {
    pub fn new(base_url: impl Into<String>, interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            interval,
        }
    }

    /// Request URL for the minute that ended one minute before `now`.
    pub fn request_url(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}/tb/price/values/ETH?start_date={}&end_date={}&ohlc=true",
            self.base_url,
            minutes_before(now, 2),
            minutes_before(now, 1),
        )
    }

    /// Fetches the latest ETH price in USD.
    pub async fn fetch(&self) -> Result<Decimal, PriceError> {
        let url = self.request_url(Utc::now());
        debug!(%url, "fetching ETH price");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status.as_u16()));
        }
        let body: Value = response.json().await?;
        parse_price(&body)
    }

    /// Polls until the subscription is dropped. The first fetch happens
    /// right away, then once per interval. The receiver starts at `None`
    /// and keeps the previous value when a poll fails.
    pub fn spawn(self) -> (Subscription, watch::Receiver<Option<Decimal>>) {
        let (tx, rx) = watch::channel(None);
        let subscription = Subscription::spawn("eth-price", async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                match self.fetch().await {
                    Ok(price) => {
                        tx.send_replace(Some(price));
                    }
                    Err(e) => warn!("price fetch failed, keeping previous value: {e}"),
                }
            }
        });
        (subscription, rx)
    }
}

fn minutes_before(now: DateTime<Utc>, minutes: i64) -> String {
    (now - chrono::Duration::minutes(minutes))
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

/// Extracts `data.entries[0][4]` from the endpoint's response.
pub fn parse_price(body: &Value) -> Result<Decimal, PriceError> {
    let close = body
        .pointer("/data/entries/0")
        .and_then(|entry| entry.get(CLOSE_INDEX))
        .ok_or_else(|| PriceError::Format("missing data.entries[0][4]".into()))?;
    let text = match close {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => return Err(PriceError::Format(format!("price is not a number: {other}"))),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| PriceError::Format(e.to_string()))
}

/// USD value of a wei balance, rounded to three places.
pub fn usd_value(balance_wei: U256, price: Decimal) -> Option<Decimal> {
    let eth = units::to_decimal(balance_wei, 18)?;
    Some((eth * price).round_dp(3))
}
