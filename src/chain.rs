//! Collaborator surfaces consumed by the engine.
//!
//! The orders smart contract, the ERC-20 token contracts, and the wallet
//! signer are external systems. The engine only ever talks to them through
//! these traits; hosts plug in their node/wallet backend of choice, tests
//! plug in mocks.
//!
//! Every method returns a [`ProviderFailure`] on error: implementations are
//! expected to serialize whatever their backend throws into that normalized
//! `{code, reason, message}` shape before it crosses this boundary.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ProviderFailure;
use crate::models::RawOrder;

pub type ChainResult<T> = Result<T, ProviderFailure>;

/// A transaction accepted by the signer but not necessarily mined yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: String,
}

impl PendingTx {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    /// The chain mined the transaction and reverted it (receipt status 0).
    Reverted,
}

/// A named event decoded from a mined transaction's logs. Argument values
/// keep their wire shape (integer quantities may arrive as `{"_hex": "0x…"}`
/// objects) and are decoded on demand.
#[derive(Debug, Clone)]
pub struct TxEvent {
    pub name: String,
    pub args: Value,
}

impl TxEvent {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub status: ReceiptStatus,
    pub events: Vec<TxEvent>,
}

impl TxReceipt {
    pub fn success(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            status: ReceiptStatus::Success,
            events: Vec::new(),
        }
    }

    pub fn reverted(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            status: ReceiptStatus::Reverted,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: TxEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn is_reverted(&self) -> bool {
        self.status == ReceiptStatus::Reverted
    }

    pub fn find_event(&self, name: &str) -> Option<&TxEvent> {
        self.events.iter().find(|e| e.name == name)
    }
}

/// Wire arguments of the `addNewOrder` contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderCall {
    pub token_in: String,
    pub token_out: String,
    pub trigger_price: String,
    pub direction: u8,
    pub raw_amount: String,
}

/// Read surface: the orders contract plus ERC-20 reads, served by a plain
/// node provider (no signing involved).
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `getOrdersByAddress(owner)`: all orders owned by an address, as raw
    /// contract tuples.
    async fn orders_by_address(&self, owner: &str) -> ChainResult<Vec<RawOrder>>;

    /// `tryGetTokenAddress(symbol)`: resolve a whitelisted symbol to its
    /// token contract address.
    async fn token_address(&self, symbol: &str) -> ChainResult<String>;

    /// `getWhitelistedSymbols(candidates)`: filter a candidate list down to
    /// the symbols the contract accepts.
    async fn whitelisted_symbols(&self, candidates: &[String]) -> ChainResult<Vec<String>>;

    /// ERC-20 `decimals()` on the given token contract.
    async fn token_decimals(&self, token_address: &str) -> ChainResult<u8>;
}

/// Write surface: signer-backed contract calls. Submission and mining are
/// separate steps so the workflow can report progress between them; there is
/// deliberately no timeout on [`ChainWriter::await_receipt`]; block
/// production time is outside this system's control.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// `addNewOrder(...)`: register the order. Creates data only; moves no
    /// funds.
    async fn add_new_order(&self, call: &NewOrderCall) -> ChainResult<PendingTx>;

    /// ERC-20 `transfer(to, rawAmount)` on the given token contract.
    async fn transfer(
        &self,
        token_address: &str,
        to: &str,
        raw_amount: &str,
    ) -> ChainResult<PendingTx>;

    /// `cancelOrder(orderId)`.
    async fn cancel_order(&self, order_id: u64) -> ChainResult<PendingTx>;

    /// Suspend until the transaction is mined and return its receipt.
    async fn await_receipt(&self, tx: &PendingTx) -> ChainResult<TxReceipt>;
}

/// The wallet/signing collaborator's account surface.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Currently connected accounts (`eth_accounts`); empty when the wallet
    /// is not connected to this origin.
    async fn accounts(&self) -> ChainResult<Vec<String>>;

    /// Prompt the user to connect (`eth_requestAccounts`). A rejection
    /// surfaces as a provider failure.
    async fn request_accounts(&self) -> ChainResult<Vec<String>>;

    /// The wallet's current chain id, e.g. `"0x1"`.
    async fn chain_id(&self) -> ChainResult<String>;
}
