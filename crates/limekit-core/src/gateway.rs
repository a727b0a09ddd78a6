//! Contract Gateway traits.
//!
//! Each screen talks to its contract through one of these traits. Writes
//! return the transaction hash once the node has accepted the submission;
//! confirmation is a separate [`ChainGateway::wait_for_receipt`] call.

use async_trait::async_trait;
use thiserror::Error;

use crate::authorization::SignedAuthorization;
use crate::types::{Address, Book, Leader, StateResult, TxHash, TxReceipt, U256};

/// Errors reported by a gateway implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transport or provider failure.
    #[error("RPC error: {0}")]
    Rpc(String),
    /// The contract rejected the call. Holds the revert message.
    #[error("{0}")]
    Revert(String),
    /// The node answered with data that does not match the ABI.
    #[error("ABI decode error: {0}")]
    Decode(String),
}

/// Operations shared by every contract gateway.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Address that signs the writes.
    fn caller(&self) -> Address;

    /// Suspends until the transaction has been mined.
    ///
    /// There is no timeout: a transaction the node never mines keeps the
    /// caller waiting.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError>;
}

/// The library contract.
#[async_trait]
pub trait LibraryGateway: ChainGateway {
    async fn owner(&self) -> Result<Address, GatewayError>;
    async fn add_book(&self, id: u64, name: &str, copies: u64) -> Result<TxHash, GatewayError>;
    async fn add_copies(&self, id: u64, copies: u64) -> Result<TxHash, GatewayError>;
    async fn remove_book(&self, id: u64) -> Result<TxHash, GatewayError>;
    /// Borrows one copy of the book (`getBook` on chain).
    async fn borrow_book(&self, id: u64) -> Result<TxHash, GatewayError>;
    async fn return_book(&self, id: u64) -> Result<TxHash, GatewayError>;
    /// Ids of the books the caller currently holds.
    async fn customer_record(&self) -> Result<Vec<u64>, GatewayError>;
    async fn book(&self, id: u64) -> Result<Book, GatewayError>;
}

/// The ETH <-> LIB wrapping functions of the library contract together
/// with the LIB token they mint.
#[async_trait]
pub trait TokenGateway: ChainGateway {
    async fn owner(&self) -> Result<Address, GatewayError>;
    /// Contract that pulls LIB on unwrap and therefore needs an allowance.
    fn spender(&self) -> Address;
    async fn wrap(&self, value: U256) -> Result<TxHash, GatewayError>;
    async fn unwrap(&self, amount: U256) -> Result<TxHash, GatewayError>;
    async fn withdraw_money(&self) -> Result<TxHash, GatewayError>;
    async fn wrap_with_signature(
        &self,
        authorization: &SignedAuthorization,
        value: U256,
    ) -> Result<TxHash, GatewayError>;
    /// LIB allowance granted by `owner` to [`TokenGateway::spender`].
    async fn allowance(&self, owner: Address) -> Result<U256, GatewayError>;
    /// Approves [`TokenGateway::spender`] for `amount` LIB.
    async fn approve(&self, amount: U256) -> Result<TxHash, GatewayError>;
    async fn token_balance(&self, owner: Address) -> Result<U256, GatewayError>;
}

/// The US election contract.
#[async_trait]
pub trait ElectionGateway: ChainGateway {
    async fn current_leader(&self) -> Result<Leader, GatewayError>;
    async fn submit_state_result(&self, result: &StateResult) -> Result<TxHash, GatewayError>;
    async fn end_election(&self) -> Result<TxHash, GatewayError>;
    /// Whether results for `state` have already been recorded.
    async fn results_submitted(&self, state: &str) -> Result<bool, GatewayError>;
}
