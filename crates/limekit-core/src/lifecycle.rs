//! Transaction lifecycle state machine.
//!
//! Every screen that writes to a contract owns one [`AttemptHandle`]. The
//! handle publishes the current [`TransactionAttempt`] on a `watch` channel so
//! observers can follow it while the submitting task is suspended on the
//! network.
//!
//! ```text
//! Idle ──begin──▶ Pending ──receipt ok──▶ Confirmed
//!   ▲               │  (hash recorded on acceptance)
//!   │               └──error / revert──▶ Failed
//!   └──────────────── reset ◀─────────────────┘
//! ```

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::gateway::{ChainGateway, GatewayError};
use crate::types::{TxHash, TxReceipt};

/// Shown when an error carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unexpected error!";

/// Why an attempt ended in [`TxStatus::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// RPC or provider failure.
    #[error("network error: {0}")]
    Network(String),
    /// The write was rejected by contract logic.
    #[error("transaction reverted: {0}")]
    ContractRevert(String),
    /// Malformed input; never reached the network.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl AttemptError {
    /// Text shown to the user: the revert or provider message verbatim.
    pub fn user_message(&self) -> &str {
        let message = match self {
            Self::Network(m) | Self::ContractRevert(m) | Self::Validation(m) => m.trim(),
        };
        if message.is_empty() {
            FALLBACK_ERROR_MESSAGE
        } else {
            message
        }
    }
}

impl From<GatewayError> for AttemptError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Revert(message) => Self::ContractRevert(message),
            other => Self::Network(other.to_string()),
        }
    }
}

/// Errors returned from a screen's `submit`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Another attempt of the same screen is still pending. Nothing was sent.
    #[error("a transaction is already pending")]
    InFlight,
    /// The submit control is disabled. Nothing was sent.
    #[error("submit is disabled: {0}")]
    Disabled(String),
    /// The attempt ended in `Failed` with this error.
    #[error(transparent)]
    Failed(#[from] AttemptError),
}

/// Coarse status of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Idle,
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    /// `hash` is `None` until the node accepts the submission.
    Pending { hash: Option<TxHash> },
    Confirmed { receipt: TxReceipt },
    Failed { error: AttemptError },
}

/// The tracked lifecycle of one user-submitted write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionAttempt {
    state: State,
    generation: u64,
}

impl TransactionAttempt {
    pub fn status(&self) -> TxStatus {
        match self.state {
            State::Idle => TxStatus::Idle,
            State::Pending { .. } => TxStatus::Pending,
            State::Confirmed { .. } => TxStatus::Confirmed,
            State::Failed { .. } => TxStatus::Failed,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    /// Transaction hash, present while pending (once accepted) and after confirmation.
    pub fn hash(&self) -> Option<TxHash> {
        match &self.state {
            State::Pending { hash } => *hash,
            State::Confirmed { receipt } => Some(receipt.hash),
            State::Idle | State::Failed { .. } => None,
        }
    }

    /// Hash of the transaction currently awaiting confirmation.
    pub fn pending_hash(&self) -> Option<TxHash> {
        match &self.state {
            State::Pending { hash } => *hash,
            _ => None,
        }
    }

    pub fn receipt(&self) -> Option<&TxReceipt> {
        match &self.state {
            State::Confirmed { receipt } => Some(receipt),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AttemptError> {
        match &self.state {
            State::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Proof that the holder started the current attempt.
///
/// Updates carrying a stale ticket (the attempt was reset or restarted in the
/// meantime) are dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Owner of one screen's [`TransactionAttempt`].
#[derive(Debug)]
pub struct AttemptHandle {
    tx: watch::Sender<TransactionAttempt>,
}

impl Default for AttemptHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptHandle {
    /// Creates a handle in `Idle`.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TransactionAttempt::default());
        Self { tx }
    }

    /// Current state of the attempt.
    pub fn snapshot(&self) -> TransactionAttempt {
        self.tx.borrow().clone()
    }

    pub fn status(&self) -> TxStatus {
        self.tx.borrow().status()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<TransactionAttempt> {
        self.tx.subscribe()
    }

    /// Moves to `Pending`. Fails with [`SubmitError::InFlight`] if an attempt
    /// is already pending.
    pub fn begin(&self) -> Result<Ticket, SubmitError> {
        let mut ticket = None;
        self.tx.send_if_modified(|attempt| {
            if attempt.is_pending() {
                return false;
            }
            attempt.generation += 1;
            attempt.state = State::Pending { hash: None };
            ticket = Some(Ticket(attempt.generation));
            true
        });
        ticket.ok_or(SubmitError::InFlight)
    }

    /// Records the hash returned by the node.
    pub fn record_hash(&self, ticket: &Ticket, hash: TxHash) {
        self.tx.send_if_modified(|attempt| {
            if attempt.generation != ticket.0 || !attempt.is_pending() {
                return false;
            }
            attempt.state = State::Pending { hash: Some(hash) };
            true
        });
    }

    /// Moves to `Confirmed` or `Failed` and hands the outcome back to the caller.
    pub fn finish(
        &self,
        ticket: Ticket,
        outcome: Result<TxReceipt, AttemptError>,
    ) -> Result<TxReceipt, SubmitError> {
        let applied = self.tx.send_if_modified(|attempt| {
            if attempt.generation != ticket.0 || !attempt.is_pending() {
                return false;
            }
            attempt.state = match &outcome {
                Ok(receipt) => State::Confirmed { receipt: *receipt },
                Err(error) => State::Failed {
                    error: error.clone(),
                },
            };
            true
        });
        if !applied {
            debug!("attempt was reset before it settled");
        }
        outcome.map_err(SubmitError::Failed)
    }

    /// Fails the attempt without touching the network (input validation).
    pub fn reject(&self, error: AttemptError) -> SubmitError {
        let mut in_flight = false;
        self.tx.send_if_modified(|attempt| {
            if attempt.is_pending() {
                in_flight = true;
                return false;
            }
            attempt.state = State::Failed {
                error: error.clone(),
            };
            true
        });
        if in_flight {
            SubmitError::InFlight
        } else {
            SubmitError::Failed(error)
        }
    }

    /// Back to `Idle`. Any submission still in flight can no longer update
    /// this attempt.
    pub fn reset(&self) {
        self.tx.send_if_modified(|attempt| {
            if attempt.state == State::Idle {
                return false;
            }
            attempt.generation += 1;
            attempt.state = State::Idle;
            true
        });
    }

    /// Clears a previous failure once the user edits the form again.
    pub fn clear_failure(&self) {
        self.tx.send_if_modified(|attempt| {
            if attempt.error().is_none() {
                return false;
            }
            attempt.state = State::Idle;
            true
        });
    }
}

/// Issues one write, records its hash and waits for it to be mined.
///
/// The attempt must already be pending under `ticket`. A mined receipt whose
/// status is failure becomes [`AttemptError::ContractRevert`].
pub async fn await_write<G, Fut>(
    attempt: &AttemptHandle,
    ticket: &Ticket,
    gateway: &G,
    write: Fut,
) -> Result<TxReceipt, AttemptError>
where
    G: ChainGateway + ?Sized,
    Fut: Future<Output = Result<TxHash, GatewayError>>,
{
    let hash = write.await?;
    info!(%hash, "transaction accepted, waiting for receipt");
    attempt.record_hash(ticket, hash);

    let receipt = gateway.wait_for_receipt(hash).await?;
    if !receipt.success {
        warn!(%hash, "transaction reverted on chain");
        return Err(AttemptError::ContractRevert(format!(
            "transaction {hash} reverted"
        )));
    }
    info!(%hash, block = ?receipt.block_number, "transaction confirmed");
    Ok(receipt)
}

/// Drives a single write from submission to `Confirmed` or `Failed`.
pub async fn submit_write<G, Fut>(
    attempt: &AttemptHandle,
    gateway: &G,
    write: Fut,
) -> Result<TxReceipt, SubmitError>
where
    G: ChainGateway + ?Sized,
    Fut: Future<Output = Result<TxHash, GatewayError>>,
{
    let ticket = attempt.begin()?;
    let outcome = await_write(attempt, &ticket, gateway, write).await;
    if let Err(e) = &outcome {
        warn!("transaction failed: {e}");
    }
    attempt.finish(ticket, outcome)
}
