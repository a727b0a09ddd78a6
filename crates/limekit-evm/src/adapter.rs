//! Chain adapter implementation.
//!
//! Connects to an EVM-compatible JSON-RPC endpoint with a local signing key
//! and provides typed contract reads, signed writes and receipt polling.

use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use alloy::transports::TransportError;
use k256::ecdsa::SigningKey;
use thiserror::Error;
use tracing::debug;

use limekit_core::gateway::GatewayError;
use limekit_core::types::{TxHash, TxReceipt};

/// Errors from EVM adapter operations.
#[derive(Debug, Error)]
pub enum EvmAdapterError {
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("URL parse error: {0}")]
    UrlParse(String),
    #[error("ABI decode error: {0}")]
    AbiDecode(String),
    #[error("{0}")]
    Revert(String),
}

impl From<EvmAdapterError> for GatewayError {
    fn from(err: EvmAdapterError) -> Self {
        match err {
            EvmAdapterError::Revert(message) => Self::Revert(message),
            EvmAdapterError::AbiDecode(message) => Self::Decode(message),
            other => Self::Rpc(other.to_string()),
        }
    }
}

/// Result alias for adapter operations.
pub type Result<T> = std::result::Result<T, EvmAdapterError>;

/// An EVM chain adapter connected to a specific RPC endpoint.
pub struct EvmAdapter {
    provider: DynProvider<Ethereum>,
    rpc_url: String,
    caller: Address,
    poll_interval: Duration,
}

impl std::fmt::Debug for EvmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmAdapter")
            .field("rpc_url", &self.rpc_url)
            .field("caller", &self.caller)
            .finish()
    }
}

impl EvmAdapter {
    /// Creates an adapter that signs writes with `signing_key`.
    ///
    /// Nonce, gas and chain id are filled in by the provider before signing.
    pub fn new(rpc_url: &str, signing_key: SigningKey, poll_interval: Duration) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let signer = PrivateKeySigner::from_signing_key(signing_key);
        let caller = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            caller,
            poll_interval,
        })
    }

    /// Creates an adapter without a wallet. Reads are issued as `caller`;
    /// writes will be rejected by the node.
    pub fn read_only(rpc_url: &str, caller: Address, poll_interval: Duration) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            caller,
            poll_interval,
        })
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Address of the signing key.
    pub fn caller(&self) -> Address {
        self.caller
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Queries the native (ETH) balance for an address.
    pub async fn get_eth_balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| EvmAdapterError::Rpc(e.to_string()))
    }

    /// `eth_call` of `call` against `to`, decoded into the call's return type.
    pub async fn read<C>(&self, to: Address, call: C) -> Result<C::Return>
    where
        C: SolCall + Send,
    {
        let request = TransactionRequest::default()
            .from(self.caller)
            .to(to)
            .input(Bytes::from(call.abi_encode()).into());

        let result: Bytes = self.provider.call(request).await.map_err(classify)?;

        <C as SolCall>::abi_decode_returns(&result)
            .map_err(|e| EvmAdapterError::AbiDecode(e.to_string()))
    }

    /// Signs and sends `call` to `to` with `value` wei attached. Returns once
    /// the node has accepted the transaction.
    pub async fn write<C>(&self, to: Address, call: C, value: U256) -> Result<TxHash>
    where
        C: SolCall + Send,
    {
        let request = TransactionRequest::default()
            .from(self.caller)
            .to(to)
            .value(value)
            .input(Bytes::from(call.abi_encode()).into());

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(classify)?;
        let hash = *pending.tx_hash();
        debug!(%hash, %to, "transaction submitted");
        Ok(hash)
    }

    /// Polls for the receipt of `hash` until the node returns one.
    pub async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| EvmAdapterError::Rpc(e.to_string()))?;
            if let Some(receipt) = receipt {
                return Ok(TxReceipt {
                    hash,
                    block_number: receipt.block_number,
                    success: receipt.status(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn parse_url(rpc_url: &str) -> Result<alloy::transports::http::reqwest::Url> {
    rpc_url
        .parse()
        .map_err(|e| EvmAdapterError::UrlParse(format!("{e}")))
}

/// Splits node errors into contract reverts and everything else.
fn classify(err: TransportError) -> EvmAdapterError {
    if let Some(payload) = err.as_error_resp() {
        if payload.message.contains("revert") {
            return EvmAdapterError::Revert(revert_reason(&payload.message));
        }
    }
    EvmAdapterError::Rpc(err.to_string())
}

/// Strips the node's `execution reverted:` prefix, keeping the contract's message.
pub fn revert_reason(message: &str) -> String {
    message
        .strip_prefix("execution reverted")
        .map(|rest| rest.trim_start_matches(':').trim())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(message)
        .to_string()
}
