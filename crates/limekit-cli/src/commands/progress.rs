//! Prints the lifecycle of a submitted transaction.

use limekit_core::chain::SupportedChainId;
use limekit_core::types::{TxHash, TxReceipt};
use limekit_core::units::shorten_hex;
use limekit_core::{AttemptHandle, SubmitError, Subscription};

use super::CliResult;

fn describe(hash: &TxHash, explorer: Option<SupportedChainId>) -> String {
    match explorer {
        Some(chain) => chain.transaction_url(hash),
        None => hash.to_string(),
    }
}

/// Prints every new pending hash of `attempt` until dropped.
pub fn track(attempt: &AttemptHandle, explorer: Option<SupportedChainId>) -> Subscription {
    let mut rx = attempt.subscribe();
    Subscription::spawn("tx-progress", async move {
        let mut last = None;
        while rx.changed().await.is_ok() {
            let Some(hash) = rx.borrow_and_update().pending_hash() else {
                continue;
            };
            if last == Some(hash) {
                continue;
            }
            last = Some(hash);
            println!("⏳ Pending: {}", shorten_hex(&hash.to_string(), 6));
            println!("   {}", describe(&hash, explorer));
        }
    })
}

/// Turns the outcome of a submit into CLI output.
pub fn report(
    outcome: Result<TxReceipt, SubmitError>,
    explorer: Option<SupportedChainId>,
) -> CliResult {
    match outcome {
        Ok(receipt) => {
            match receipt.block_number {
                Some(block) => println!("✅ Confirmed in block {block}"),
                None => println!("✅ Confirmed"),
            }
            println!("   Tx: {}", describe(&receipt.hash, explorer));
            Ok(())
        }
        Err(SubmitError::Failed(error)) => Err(error.user_message().into()),
        Err(other) => Err(other.to_string().into()),
    }
}
