//! Display helpers for hashes and token amounts.

use std::str::FromStr;

use alloy_primitives::utils::format_units;
use rust_decimal::Decimal;

use crate::types::U256;

/// Shortens a hex string to `0x1234…abcd`, keeping `length` chars on each side.
pub fn shorten_hex(hex: &str, length: usize) -> String {
    if hex.len() <= length * 2 + 2 {
        return hex.to_string();
    }
    format!("{}…{}", &hex[..length + 2], &hex[hex.len() - length..])
}

/// Converts a raw token amount into a decimal with `decimals` places.
pub fn to_decimal(value: U256, decimals: u8) -> Option<Decimal> {
    let formatted = format_units(value, decimals).ok()?;
    Decimal::from_str(&formatted).ok()
}

/// Formats a raw token amount with a fixed number of displayed decimals.
///
/// Amounts too large for a `Decimal` fall back to the full unit string.
pub fn format_balance(value: U256, decimals: u8, display: u32) -> String {
    match to_decimal(value, decimals) {
        Some(amount) => format!("{:.prec$}", amount.round_dp(display), prec = display as usize),
        None => format_units(value, decimals).unwrap_or_else(|_| value.to_string()),
    }
}
