//! Token screen: wrap ETH into LIB, unwrap it back, and the owner-only
//! withdrawal.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::{lock, Screen};
use crate::authorization::SignedAuthorization;
use crate::forms::TokenForm;
use crate::gateway::TokenGateway;
use crate::lifecycle::{self, AttemptError, AttemptHandle, SubmitError, Ticket};
use crate::types::{TxReceipt, U256};

/// Operations offered by the token screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOperation {
    Wrap,
    Unwrap,
    Withdraw,
    WrapWithSignature,
}

impl TokenOperation {
    pub fn title(self) -> &'static str {
        match self {
            Self::Wrap => "Wrap",
            Self::Unwrap => "Unwrap",
            Self::Withdraw => "Withdraw",
            Self::WrapWithSignature => "Wrap with signature",
        }
    }

    pub fn owner_only(self) -> bool {
        matches!(self, Self::Withdraw)
    }

    /// Whether the amount input is read.
    pub fn needs_amount(self) -> bool {
        !matches!(self, Self::Withdraw)
    }
}

impl fmt::Display for TokenOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A validated token write. Amounts are in wei.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    Wrap { value: U256 },
    Unwrap { amount: U256 },
    Withdraw,
    WrapWithSignature {
        authorization: SignedAuthorization,
        value: U256,
    },
}

#[derive(Debug, Default)]
struct TokenState {
    form: TokenForm,
    is_owner: bool,
    balance: Option<U256>,
}

/// Controller of the token screen.
pub struct TokenScreen<G> {
    gateway: Arc<G>,
    attempt: AttemptHandle,
    approval_amount: U256,
    authorization: Option<SignedAuthorization>,
    state: Mutex<TokenState>,
}

impl<G> fmt::Debug for TokenScreen<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenScreen")
            .field("attempt", &self.attempt.status())
            .field("approval_amount", &self.approval_amount)
            .finish_non_exhaustive()
    }
}

impl<G: TokenGateway> TokenScreen<G> {
    /// `approval_amount` is the minimum allowance granted when an unwrap
    /// needs approval first.
    pub fn new(gateway: Arc<G>, approval_amount: U256) -> Self {
        Self {
            gateway,
            attempt: AttemptHandle::new(),
            approval_amount,
            authorization: None,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Enables [`TokenOperation::WrapWithSignature`].
    pub fn with_authorization(mut self, authorization: SignedAuthorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn attempt(&self) -> &AttemptHandle {
        &self.attempt
    }

    pub fn amount(&self) -> String {
        lock(&self.state).form.amount.clone()
    }

    pub fn is_owner(&self) -> bool {
        lock(&self.state).is_owner
    }

    /// Last fetched LIB balance of the caller.
    pub fn balance(&self) -> Option<U256> {
        lock(&self.state).balance
    }

    pub fn available_operations(&self) -> Vec<TokenOperation> {
        let is_owner = self.is_owner();
        let mut ops = vec![TokenOperation::Wrap, TokenOperation::Unwrap];
        if self.authorization.is_some() {
            ops.push(TokenOperation::WrapWithSignature);
        }
        if is_owner {
            ops.push(TokenOperation::Withdraw);
        }
        ops
    }

    pub async fn mount(&self) -> Result<(), AttemptError> {
        let owner = self.gateway.owner().await?;
        let is_owner = owner == self.gateway.caller();
        lock(&self.state).is_owner = is_owner;
        debug!(is_owner, "token screen mounted");
        self.refresh_balance().await?;
        Ok(())
    }

    /// Edits the amount. Clears a previous failure.
    pub fn set_amount(&self, value: impl Into<String>) {
        lock(&self.state).form.amount = value.into();
        self.attempt.clear_failure();
    }

    pub async fn refresh_balance(&self) -> Result<U256, AttemptError> {
        let balance = self.gateway.token_balance(self.gateway.caller()).await?;
        lock(&self.state).balance = Some(balance);
        Ok(balance)
    }

    pub async fn submit(&self, op: TokenOperation) -> Result<TxReceipt, SubmitError> {
        if self.attempt.snapshot().is_pending() {
            return Err(SubmitError::InFlight);
        }
        let form = lock(&self.state).form.clone();
        let action = self
            .action_for(op, &form)
            .map_err(|e| self.attempt.reject(e))?;
        debug!(?action, "submitting token action");

        let gateway = &*self.gateway;
        let receipt = match &action {
            TokenAction::Wrap { value } => {
                lifecycle::submit_write(&self.attempt, gateway, gateway.wrap(*value)).await?
            }
            TokenAction::Unwrap { amount } => self.unwrap_with_approval(*amount).await?,
            TokenAction::Withdraw => {
                lifecycle::submit_write(&self.attempt, gateway, gateway.withdraw_money()).await?
            }
            TokenAction::WrapWithSignature {
                authorization,
                value,
            } => {
                let write = gateway.wrap_with_signature(authorization, *value);
                lifecycle::submit_write(&self.attempt, gateway, write).await?
            }
        };

        lock(&self.state).form.clear();
        if let Err(e) = self.refresh_balance().await {
            warn!("failed to refresh LIB balance: {e}");
        }
        Ok(receipt)
    }

    fn action_for(&self, op: TokenOperation, form: &TokenForm) -> Result<TokenAction, AttemptError> {
        Ok(match op {
            TokenOperation::Wrap => TokenAction::Wrap {
                value: form.amount_wei()?,
            },
            TokenOperation::Unwrap => TokenAction::Unwrap {
                amount: form.amount_wei()?,
            },
            TokenOperation::Withdraw => TokenAction::Withdraw,
            TokenOperation::WrapWithSignature => {
                let authorization = self.authorization.clone().ok_or_else(|| {
                    AttemptError::Validation("no signed authorization configured".into())
                })?;
                TokenAction::WrapWithSignature {
                    authorization,
                    value: form.amount_wei()?,
                }
            }
        })
    }

    /// Unwrap as one attempt: approve first when the allowance is short,
    /// then unwrap. Either failing fails the whole attempt.
    async fn unwrap_with_approval(&self, amount: U256) -> Result<TxReceipt, SubmitError> {
        let ticket = self.attempt.begin()?;
        let outcome = self.approve_then_unwrap(&ticket, amount).await;
        if let Err(e) = &outcome {
            warn!("unwrap failed: {e}");
        }
        self.attempt.finish(ticket, outcome)
    }

    async fn approve_then_unwrap(
        &self,
        ticket: &Ticket,
        amount: U256,
    ) -> Result<TxReceipt, AttemptError> {
        let gateway = &*self.gateway;
        let allowance = gateway.allowance(gateway.caller()).await?;
        if allowance < amount {
            let approval = amount.max(self.approval_amount);
            info!(%allowance, %approval, "allowance too low, approving LIB first");
            lifecycle::await_write(&self.attempt, ticket, gateway, gateway.approve(approval))
                .await?;
        } else {
            debug!(%allowance, "allowance sufficient, skipping approval");
        }
        lifecycle::await_write(&self.attempt, ticket, gateway, gateway.unwrap(amount)).await
    }
}

impl<G: TokenGateway> Screen for TokenScreen<G> {
    fn reset(&self) {
        lock(&self.state).form.clear();
        self.attempt.reset();
    }
}
