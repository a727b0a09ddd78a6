//! Library contract gateway.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use limekit_core::gateway::{ChainGateway, GatewayError, LibraryGateway};
use limekit_core::types::{Book, TxHash, TxReceipt};

use crate::abi::ILibrary;
use crate::adapter::EvmAdapter;

/// [`LibraryGateway`] backed by a deployed library contract.
#[derive(Debug, Clone)]
pub struct LibraryContract {
    adapter: Arc<EvmAdapter>,
    address: Address,
}

impl LibraryContract {
    pub fn new(adapter: Arc<EvmAdapter>, address: Address) -> Self {
        Self { adapter, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// Narrows a `uint256` the contract returns to the `u64` ids and counts the
/// screens work with.
pub(crate) fn to_u64(value: U256, what: &str) -> Result<u64, GatewayError> {
    u64::try_from(value).map_err(|_| GatewayError::Decode(format!("{what} {value} exceeds u64")))
}

#[async_trait]
impl ChainGateway for LibraryContract {
    fn caller(&self) -> Address {
        self.adapter.caller()
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        Ok(self.adapter.wait_for_receipt(hash).await?)
    }
}

#[async_trait]
impl LibraryGateway for LibraryContract {
    async fn owner(&self) -> Result<Address, GatewayError> {
        Ok(self
            .adapter
            .read(self.address, ILibrary::ownerCall {})
            .await?)
    }

    async fn add_book(&self, id: u64, name: &str, copies: u64) -> Result<TxHash, GatewayError> {
        let call = ILibrary::addBookCall {
            id: U256::from(id),
            name: name.to_string(),
            copies: U256::from(copies),
        };
        Ok(self.adapter.write(self.address, call, U256::ZERO).await?)
    }

    async fn add_copies(&self, id: u64, copies: u64) -> Result<TxHash, GatewayError> {
        let call = ILibrary::addCopiesCall {
            id: U256::from(id),
            copies: U256::from(copies),
        };
        Ok(self.adapter.write(self.address, call, U256::ZERO).await?)
    }

    async fn remove_book(&self, id: u64) -> Result<TxHash, GatewayError> {
        let call = ILibrary::removeBookCall { id: U256::from(id) };
        Ok(self.adapter.write(self.address, call, U256::ZERO).await?)
    }

    async fn borrow_book(&self, id: u64) -> Result<TxHash, GatewayError> {
        let call = ILibrary::getBookCall { id: U256::from(id) };
        Ok(self.adapter.write(self.address, call, U256::ZERO).await?)
    }

    async fn return_book(&self, id: u64) -> Result<TxHash, GatewayError> {
        let call = ILibrary::returnBookCall { id: U256::from(id) };
        Ok(self.adapter.write(self.address, call, U256::ZERO).await?)
    }

    async fn customer_record(&self) -> Result<Vec<u64>, GatewayError> {
        let ids = self
            .adapter
            .read(self.address, ILibrary::getCustomerRecordCall {})
            .await?;
        ids.into_iter().map(|id| to_u64(id, "book id")).collect()
    }

    async fn book(&self, id: u64) -> Result<Book, GatewayError> {
        let record = self
            .adapter
            .read(self.address, ILibrary::booksCall { bookId: U256::from(id) })
            .await?;
        Ok(Book {
            id: to_u64(record.id, "book id")?,
            name: record.name,
            copies: to_u64(record.copies, "copies")?,
        })
    }
}
