//! Election screen: per-state result submission and ending the election.
//!
//! Typing a state name schedules a debounced `resultsSubmitted` lookup; a
//! state that already has results blocks the submit control until the name
//! changes.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{lock, Screen};
use crate::debounce::Debouncer;
use crate::forms::{ElectionField, ElectionForm};
use crate::gateway::ElectionGateway;
use crate::lifecycle::{self, AttemptError, AttemptHandle, SubmitError};
use crate::types::{Leader, TxReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionOperation {
    SubmitResult,
    EndElection,
}

/// Outcome of the "already submitted?" lookup for the typed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultCheck {
    #[default]
    Unchecked,
    Checking,
    Available,
    AlreadySubmitted,
}

impl ResultCheck {
    pub fn blocks_submit(self) -> bool {
        self == Self::AlreadySubmitted
    }
}

/// Controller of the election screen.
pub struct ElectionScreen<G> {
    gateway: Arc<G>,
    attempt: AttemptHandle,
    form: Arc<Mutex<ElectionForm>>,
    check: Arc<watch::Sender<ResultCheck>>,
    debouncer: Debouncer,
    leader: Mutex<Leader>,
}

impl<G> fmt::Debug for ElectionScreen<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElectionScreen")
            .field("attempt", &self.attempt.status())
            .field("check", &*self.check.borrow())
            .finish_non_exhaustive()
    }
}

impl<G: ElectionGateway + 'static> ElectionScreen<G> {
    /// `debounce` is the quiet period before a typed state name is looked up.
    pub fn new(gateway: Arc<G>, debounce: Duration) -> Self {
        let (check, _) = watch::channel(ResultCheck::Unchecked);
        Self {
            gateway,
            attempt: AttemptHandle::new(),
            form: Arc::new(Mutex::new(ElectionForm::default())),
            check: Arc::new(check),
            debouncer: Debouncer::new(debounce),
            leader: Mutex::new(Leader::Unknown),
        }
    }

    pub fn attempt(&self) -> &AttemptHandle {
        &self.attempt
    }

    pub fn form(&self) -> ElectionForm {
        lock(&self.form).clone()
    }

    pub fn leader(&self) -> Leader {
        *lock(&self.leader)
    }

    pub fn result_check(&self) -> ResultCheck {
        *self.check.borrow()
    }

    pub async fn mount(&self) -> Result<(), AttemptError> {
        self.refresh_leader().await?;
        Ok(())
    }

    pub async fn refresh_leader(&self) -> Result<Leader, AttemptError> {
        let leader = self.gateway.current_leader().await?;
        *lock(&self.leader) = leader;
        Ok(leader)
    }

    /// Edits one input. Editing the state name restarts the debounced check.
    pub fn set_field(&self, field: ElectionField, value: impl Into<String>) {
        lock(&self.form).set(field, value);
        self.attempt.clear_failure();
        if field == ElectionField::State {
            self.schedule_check();
        }
    }

    fn schedule_check(&self) {
        self.check.send_replace(ResultCheck::Unchecked);
        let name = lock(&self.form).state_name().to_string();
        if name.is_empty() {
            self.debouncer.cancel();
            return;
        }

        let gateway = Arc::clone(&self.gateway);
        let form = Arc::clone(&self.form);
        let check = Arc::clone(&self.check);
        self.debouncer.schedule(async move {
            check.send_replace(ResultCheck::Checking);
            let submitted = gateway.results_submitted(&name).await;

            let still_current = lock(&form).state_name() == name;
            if !still_current {
                debug!(state = %name, "dropping stale result check");
                return;
            }
            let outcome = match submitted {
                Ok(true) => ResultCheck::AlreadySubmitted,
                Ok(false) => ResultCheck::Available,
                Err(e) => {
                    warn!(state = %name, "result check failed: {e}");
                    ResultCheck::Unchecked
                }
            };
            debug!(state = %name, ?outcome, "result check finished");
            check.send_replace(outcome);
        });
    }

    pub async fn submit(&self, op: ElectionOperation) -> Result<TxReceipt, SubmitError> {
        if self.attempt.snapshot().is_pending() {
            return Err(SubmitError::InFlight);
        }
        let gateway = &*self.gateway;

        let receipt = match op {
            ElectionOperation::SubmitResult => {
                if self.result_check().blocks_submit() {
                    return Err(SubmitError::Disabled(
                        "results for this state have already been submitted".into(),
                    ));
                }
                let result = lock(&self.form)
                    .to_result()
                    .map_err(|e| self.attempt.reject(e))?;
                debug!(state = %result.name, "submitting state result");
                let receipt = lifecycle::submit_write(
                    &self.attempt,
                    gateway,
                    gateway.submit_state_result(&result),
                )
                .await?;
                self.clear_form();
                receipt
            }
            ElectionOperation::EndElection => {
                lifecycle::submit_write(&self.attempt, gateway, gateway.end_election()).await?
            }
        };

        if let Err(e) = self.refresh_leader().await {
            warn!("failed to refresh current leader: {e}");
        }
        Ok(receipt)
    }

    fn clear_form(&self) {
        self.debouncer.cancel();
        lock(&self.form).clear();
        self.check.send_replace(ResultCheck::Unchecked);
    }
}

impl<G: ElectionGateway + 'static> Screen for ElectionScreen<G> {
    fn reset(&self) {
        self.clear_form();
        self.attempt.reset();
    }
}
