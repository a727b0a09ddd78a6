//! In-memory gateways for the screen tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use limekit_core::authorization::SignedAuthorization;
use limekit_core::gateway::{
    ChainGateway, ElectionGateway, GatewayError, LibraryGateway, TokenGateway,
};
use limekit_core::types::{Address, Book, Leader, StateResult, TxHash, TxReceipt, U256};

pub const CALLER: Address = Address::repeat_byte(0xaa);
pub const OWNER: Address = Address::repeat_byte(0xbb);
pub const SPENDER: Address = Address::repeat_byte(0xcc);

/// Call log, hash source and receipt gate shared by the fakes.
pub struct Ledger {
    calls: Mutex<Vec<String>>,
    next_hash: AtomicU8,
    receipts: Semaphore,
    failures: Mutex<HashMap<&'static str, GatewayError>>,
    reverted: Mutex<HashSet<&'static str>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    /// Receipts are withheld until [`Ledger::release`] is called.
    pub fn held() -> Self {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_hash: AtomicU8::new(1),
            receipts: Semaphore::new(permits),
            failures: Mutex::new(HashMap::new()),
            reverted: Mutex::new(HashSet::new()),
        }
    }

    pub fn release(&self, receipts: usize) {
        self.receipts.add_permits(receipts);
    }

    /// Makes the next call named `method` fail with `error`.
    pub fn fail(&self, method: &'static str, error: GatewayError) {
        self.failures.lock().unwrap().insert(method, error);
    }

    /// Writes named `method` are accepted but mined with a failed status.
    pub fn revert_on_chain(&self, method: &'static str) {
        self.reverted.lock().unwrap().insert(method);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split('(').next() == Some(method))
            .count()
    }

    fn record(&self, method: &'static str, call: String) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().remove(method) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn write(&self, method: &'static str, call: String) -> Result<TxHash, GatewayError> {
        self.record(method, call)?;
        let byte = self.next_hash.fetch_add(1, Ordering::SeqCst);
        let hash = TxHash::repeat_byte(byte);
        if self.reverted.lock().unwrap().contains(method) {
            self.calls.lock().unwrap().push(format!("reverted({hash})"));
        }
        Ok(hash)
    }

    async fn receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        let permit = self
            .receipts
            .acquire()
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))?;
        permit.forget();
        self.record("wait_for_receipt", format!("wait_for_receipt({hash})"))?;
        let success = !self
            .calls
            .lock()
            .unwrap()
            .contains(&format!("reverted({hash})"));
        Ok(TxReceipt {
            hash,
            block_number: Some(100),
            success,
        })
    }
}

// ========== Library ==========

pub struct FakeLibrary {
    pub ledger: Ledger,
    pub owner: Address,
    pub books: Mutex<HashMap<u64, Book>>,
    pub record: Mutex<Vec<u64>>,
}

impl FakeLibrary {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            owner: CALLER,
            books: Mutex::new(HashMap::new()),
            record: Mutex::new(Vec::new()),
        }
    }

    pub fn with_book(self, id: u64, name: &str, copies: u64) -> Self {
        self.books.lock().unwrap().insert(
            id,
            Book {
                id,
                name: name.to_string(),
                copies,
            },
        );
        self
    }
}

#[async_trait]
impl ChainGateway for FakeLibrary {
    fn caller(&self) -> Address {
        CALLER
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        self.ledger.receipt(hash).await
    }
}

#[async_trait]
impl LibraryGateway for FakeLibrary {
    async fn owner(&self) -> Result<Address, GatewayError> {
        self.ledger.record("owner", "owner()".into())?;
        Ok(self.owner)
    }

    async fn add_book(&self, id: u64, name: &str, copies: u64) -> Result<TxHash, GatewayError> {
        let hash = self
            .ledger
            .write("add_book", format!("add_book({id},{name},{copies})"))?;
        self.books.lock().unwrap().insert(
            id,
            Book {
                id,
                name: name.to_string(),
                copies,
            },
        );
        Ok(hash)
    }

    async fn add_copies(&self, id: u64, copies: u64) -> Result<TxHash, GatewayError> {
        let hash = self
            .ledger
            .write("add_copies", format!("add_copies({id},{copies})"))?;
        if let Some(book) = self.books.lock().unwrap().get_mut(&id) {
            book.copies += copies;
        }
        Ok(hash)
    }

    async fn remove_book(&self, id: u64) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write("remove_book", format!("remove_book({id})"))?;
        self.books.lock().unwrap().remove(&id);
        Ok(hash)
    }

    async fn borrow_book(&self, id: u64) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write("borrow_book", format!("borrow_book({id})"))?;
        self.record.lock().unwrap().push(id);
        Ok(hash)
    }

    async fn return_book(&self, id: u64) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write("return_book", format!("return_book({id})"))?;
        self.record.lock().unwrap().retain(|b| *b != id);
        Ok(hash)
    }

    async fn customer_record(&self) -> Result<Vec<u64>, GatewayError> {
        self.ledger
            .record("customer_record", "customer_record()".into())?;
        Ok(self.record.lock().unwrap().clone())
    }

    async fn book(&self, id: u64) -> Result<Book, GatewayError> {
        self.ledger.record("book", format!("book({id})"))?;
        Ok(self
            .books
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or(Book {
                id: 0,
                name: String::new(),
                copies: 0,
            }))
    }
}

// ========== Token ==========

pub struct FakeToken {
    pub ledger: Ledger,
    pub allowance: Mutex<U256>,
    pub balance: Mutex<U256>,
}

impl FakeToken {
    pub fn new(ledger: Ledger, allowance: U256) -> Self {
        Self {
            ledger,
            allowance: Mutex::new(allowance),
            balance: Mutex::new(U256::ZERO),
        }
    }
}

#[async_trait]
impl ChainGateway for FakeToken {
    fn caller(&self) -> Address {
        CALLER
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        self.ledger.receipt(hash).await
    }
}

#[async_trait]
impl TokenGateway for FakeToken {
    async fn owner(&self) -> Result<Address, GatewayError> {
        self.ledger.record("owner", "owner()".into())?;
        Ok(OWNER)
    }

    fn spender(&self) -> Address {
        SPENDER
    }

    async fn wrap(&self, value: U256) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write("wrap", format!("wrap({value})"))?;
        *self.balance.lock().unwrap() += value;
        Ok(hash)
    }

    async fn unwrap(&self, amount: U256) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write("unwrap", format!("unwrap({amount})"))?;
        let mut balance = self.balance.lock().unwrap();
        *balance = balance.saturating_sub(amount);
        Ok(hash)
    }

    async fn withdraw_money(&self) -> Result<TxHash, GatewayError> {
        self.ledger.write("withdraw_money", "withdraw_money()".into())
    }

    async fn wrap_with_signature(
        &self,
        authorization: &SignedAuthorization,
        value: U256,
    ) -> Result<TxHash, GatewayError> {
        self.ledger.write(
            "wrap_with_signature",
            format!(
                "wrap_with_signature({},{},{value})",
                authorization.signer, authorization.signature.v
            ),
        )
    }

    async fn allowance(&self, owner: Address) -> Result<U256, GatewayError> {
        self.ledger.record("allowance", format!("allowance({owner})"))?;
        Ok(*self.allowance.lock().unwrap())
    }

    async fn approve(&self, amount: U256) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write("approve", format!("approve({amount})"))?;
        *self.allowance.lock().unwrap() = amount;
        Ok(hash)
    }

    async fn token_balance(&self, owner: Address) -> Result<U256, GatewayError> {
        self.ledger
            .record("token_balance", format!("token_balance({owner})"))?;
        Ok(*self.balance.lock().unwrap())
    }
}

// ========== Election ==========

pub struct FakeElection {
    pub ledger: Ledger,
    pub submitted: Mutex<HashSet<String>>,
    pub leader: Mutex<Leader>,
}

impl FakeElection {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            submitted: Mutex::new(HashSet::new()),
            leader: Mutex::new(Leader::Unknown),
        }
    }

    pub fn with_submitted(self, state: &str) -> Self {
        self.submitted.lock().unwrap().insert(state.to_string());
        self
    }
}

#[async_trait]
impl ChainGateway for FakeElection {
    fn caller(&self) -> Address {
        CALLER
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, GatewayError> {
        self.ledger.receipt(hash).await
    }
}

#[async_trait]
impl ElectionGateway for FakeElection {
    async fn current_leader(&self) -> Result<Leader, GatewayError> {
        self.ledger.record("current_leader", "current_leader()".into())?;
        Ok(*self.leader.lock().unwrap())
    }

    async fn submit_state_result(&self, result: &StateResult) -> Result<TxHash, GatewayError> {
        let hash = self.ledger.write(
            "submit_state_result",
            format!(
                "submit_state_result({},{},{},{})",
                result.name, result.votes_biden, result.votes_trump, result.seats
            ),
        )?;
        self.submitted.lock().unwrap().insert(result.name.clone());
        *self.leader.lock().unwrap() = if result.votes_biden > result.votes_trump {
            Leader::Biden
        } else {
            Leader::Trump
        };
        Ok(hash)
    }

    async fn end_election(&self) -> Result<TxHash, GatewayError> {
        self.ledger.write("end_election", "end_election()".into())
    }

    async fn results_submitted(&self, state: &str) -> Result<bool, GatewayError> {
        self.ledger
            .record("results_submitted", format!("results_submitted({state})"))?;
        Ok(self.submitted.lock().unwrap().contains(state))
    }
}
