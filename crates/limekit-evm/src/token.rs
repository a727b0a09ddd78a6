//! LIB token gateway: the library's wrap functions plus the ERC-20 they mint.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use limekit_core::authorization::SignedAuthorization;
use limekit_core::gateway::{ChainGateway, GatewayError, TokenGateway};
use limekit_core::types::{TxHash, TxReceipt};

use crate::abi::{ILibrary, IERC20};
use crate::adapter::EvmAdapter;

/// [`TokenGateway`] over the library contract and its LIB token.
#[derive(Debug, Clone)]
pub struct TokenContract {
    adapter: Arc<EvmAdapter>,
    library: Address,
    token: Address,
}

impl TokenContract {
    pub fn new(adapter: Arc<EvmAdapter>, library: Address, token: Address) -> Self {
        Self {
            adapter,
            library,
            token,
        }
    }

    pub fn token(&self) -> Address {
        self.token
    }
}

/// Reads the ERC-20 balance of `owner` at `token`.
pub async fn erc20_balance(
    adapter: &EvmAdapter,
    token: Address,
    owner: Address,
) -> Result<U256, GatewayError> {
    Ok(adapter.read(token, IERC20::balanceOfCall { owner }).await?)
}

#[async_trait]
impl ChainGateway for TokenContract {
    fn caller(&self) -> Address {
        self.adapter.caller()
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        Ok(self.adapter.wait_for_receipt(hash).await?)
    }
}

#[async_trait]
impl TokenGateway for TokenContract {
    async fn owner(&self) -> Result<Address, GatewayError> {
        Ok(self
            .adapter
            .read(self.library, ILibrary::ownerCall {})
            .await?)
    }

    fn spender(&self) -> Address {
        self.library
    }

    async fn wrap(&self, value: U256) -> Result<TxHash, GatewayError> {
        Ok(self
            .adapter
            .write(self.library, ILibrary::wrapCall {}, value)
            .await?)
    }

    async fn unwrap(&self, amount: U256) -> Result<TxHash, GatewayError> {
        let call = ILibrary::unwrapCall { value: amount };
        Ok(self.adapter.write(self.library, call, U256::ZERO).await?)
    }

    async fn withdraw_money(&self) -> Result<TxHash, GatewayError> {
        Ok(self
            .adapter
            .write(self.library, ILibrary::withdrawMoneyCall {}, U256::ZERO)
            .await?)
    }

    async fn wrap_with_signature(
        &self,
        authorization: &SignedAuthorization,
        value: U256,
    ) -> Result<TxHash, GatewayError> {
        let signature = &authorization.signature;
        let call = ILibrary::wrapWithSignatureCall {
            hashedMessage: authorization.message_hash,
            v: signature.v,
            r: signature.r,
            s: signature.s,
            signer: authorization.signer,
        };
        Ok(self.adapter.write(self.library, call, value).await?)
    }

    async fn allowance(&self, owner: Address) -> Result<U256, GatewayError> {
        let call = IERC20::allowanceCall {
            owner,
            spender: self.library,
        };
        Ok(self.adapter.read(self.token, call).await?)
    }

    async fn approve(&self, amount: U256) -> Result<TxHash, GatewayError> {
        let call = IERC20::approveCall {
            spender: self.library,
            amount,
        };
        Ok(self.adapter.write(self.token, call, U256::ZERO).await?)
    }

    async fn token_balance(&self, owner: Address) -> Result<U256, GatewayError> {
        erc20_balance(&self.adapter, self.token, owner).await
    }
}
