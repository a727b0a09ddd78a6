//! US election contract gateway.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use limekit_core::gateway::{ChainGateway, ElectionGateway, GatewayError};
use limekit_core::types::{Leader, StateResult, TxHash, TxReceipt};

use crate::abi::IUSElection;
use crate::adapter::EvmAdapter;

#[derive(Debug, Clone)]
pub struct ElectionContract {
    adapter: Arc<EvmAdapter>,
    address: Address,
}

impl ElectionContract {
    pub fn new(adapter: Arc<EvmAdapter>, address: Address) -> Self {
        Self { adapter, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn adapter(&self) -> &Arc<EvmAdapter> {
        &self.adapter
    }
}

impl From<&StateResult> for IUSElection::StateResult {
    fn from(result: &StateResult) -> Self {
        Self {
            name: result.name.clone(),
            votesBiden: U256::from(result.votes_biden),
            votesTrump: U256::from(result.votes_trump),
            stateSeats: result.seats,
        }
    }
}

#[async_trait]
impl ChainGateway for ElectionContract {
    fn caller(&self) -> Address {
        self.adapter.caller()
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        Ok(self.adapter.wait_for_receipt(hash).await?)
    }
}

#[async_trait]
impl ElectionGateway for ElectionContract {
    async fn current_leader(&self) -> Result<Leader, GatewayError> {
        let leader = self
            .adapter
            .read(self.address, IUSElection::currentLeaderCall {})
            .await?;
        Ok(Leader::from(leader))
    }

    async fn submit_state_result(&self, result: &StateResult) -> Result<TxHash, GatewayError> {
        let call = IUSElection::submitStateResultCall {
            result: result.into(),
        };
        Ok(self.adapter.write(self.address, call, U256::ZERO).await?)
    }

    async fn end_election(&self) -> Result<TxHash, GatewayError> {
        Ok(self
            .adapter
            .write(self.address, IUSElection::endElectionCall {}, U256::ZERO)
            .await?)
    }

    async fn results_submitted(&self, state: &str) -> Result<bool, GatewayError> {
        let call = IUSElection::resultsSubmittedCall {
            state: state.to_string(),
        };
        Ok(self.adapter.read(self.address, call).await?)
    }
}
