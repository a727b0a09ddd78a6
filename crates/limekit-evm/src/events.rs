//! Election event subscription.
//!
//! Installs a log filter on the election contract and turns the polled logs
//! into [`ElectionEvent`]s.

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use futures_util::{stream, Stream, StreamExt};
use tracing::debug;

use limekit_core::events::ElectionEvent;
use limekit_core::types::Leader;

use crate::abi::IUSElection;
use crate::adapter::{EvmAdapter, EvmAdapterError, Result};

/// Filter matching both election events emitted by `contract`.
pub fn election_filter(contract: Address) -> Filter {
    Filter::new().address(contract).event_signature(vec![
        IUSElection::LogStateResult::SIGNATURE_HASH,
        IUSElection::LogElectionEnded::SIGNATURE_HASH,
    ])
}

/// Decodes a log of the election contract. Unrelated logs yield `None`.
pub fn decode_election_log(log: &Log) -> Option<ElectionEvent> {
    let topic = *log.topic0()?;
    if topic == IUSElection::LogStateResult::SIGNATURE_HASH {
        let event = log.log_decode::<IUSElection::LogStateResult>().ok()?.inner.data;
        Some(ElectionEvent::StateResult {
            winner: Leader::from(event.winner),
            seats: event.stateSeats,
            state: event.state,
        })
    } else if topic == IUSElection::LogElectionEnded::SIGNATURE_HASH {
        let event = log
            .log_decode::<IUSElection::LogElectionEnded>()
            .ok()?
            .inner
            .data;
        Some(ElectionEvent::ElectionEnded {
            winner: Leader::from(event.winner),
        })
    } else {
        None
    }
}

/// Streams new election events from `contract`, polling the node at the
/// adapter's poll interval.
pub async fn watch_election_events(
    adapter: &EvmAdapter,
    contract: Address,
) -> Result<impl Stream<Item = ElectionEvent> + Send + 'static> {
    let poller = adapter
        .provider()
        .watch_logs(&election_filter(contract))
        .await
        .map_err(|e| EvmAdapterError::Rpc(e.to_string()))?
        .with_poll_interval(adapter.poll_interval());
    debug!(%contract, "watching election events");

    Ok(poller
        .into_stream()
        .flat_map(stream::iter)
        .filter_map(|log| async move { decode_election_log(&log) }))
}
