//! # flyweight-rs
//!
//! Client engine for the Flyweight decentralized limit-order protocol: an
//! order is a standing instruction to swap one ERC-20 token for another once
//! its USD price crosses a threshold. Orders are recorded on a smart
//! contract, funded by a separate deposit transaction, and executed by an
//! off-chain oracle when triggered.
//!
//! This crate is the reconciliation and transaction-submission engine that
//! protocol front-ends sit on. Hosts plug their node/wallet backends into
//! the [`chain`] traits, build a [`Session`], and render the alerts and
//! dashboard projections it produces.
//!
//! | Component | Role |
//! |-----------|------|
//! | [`amount`] | exact decimal ↔ raw on-chain unit conversion |
//! | [`decimals`] | lazy per-session token decimals cache |
//! | [`views`] | anonymized, display-ready order projections |
//! | [`workflow`] | order submission & cancellation workflows |
//! | [`errors`] | failure taxonomy + provider-error classifier |
//! | [`oracle`] | off-chain deposit-verification callout |
//! | [`network`] | per-network contract/explorer/oracle configuration |
//!
//! ## Amount conversion
//!
//! All monetary arithmetic is exact decimal arithmetic; raw on-chain units
//! are scaled by each token's own decimal count:
//!
//! ```rust
//! use flyweight_rs::amount;
//! use rust_decimal::Decimal;
//!
//! let human: Decimal = "0.001".parse().unwrap();
//! assert_eq!(amount::to_raw_units(human, 18).unwrap(), "1000000000000000");
//! assert_eq!(amount::to_display_amount(1000, 18).unwrap(), "0.000000000000001");
//! ```
//!
//! ## Workflows
//!
//! Creating an order is deliberately two transactions (`addNewOrder`
//! registers intent without moving funds, then an ERC-20 `transfer` deposits
//! them), followed by an off-chain callout telling the verification oracle
//! about the deposit. [`Session::submit_order`] drives the whole sequence
//! and publishes a progress alert around every step;
//! [`Session::cancel_order`] refunds a standing order and summarizes the
//! refund from the mined receipt.

pub mod amount;
pub mod chain;
pub mod decimals;
pub mod errors;
pub mod models;
pub mod network;
pub mod oracle;
pub mod session;
pub mod utils;
pub mod views;
pub mod workflow;

pub use chain::{
    ChainReader, ChainWriter, NewOrderCall, PendingTx, ReceiptStatus, TxEvent, TxReceipt,
    WalletProvider,
};
pub use decimals::TokenDecimalsCache;
pub use errors::{
    classify, EngineError, ProviderFailure, ProviderOutcome, TxPhase, ValidationError,
};
pub use models::{
    Alert, AlertCode, AlertSlot, AlertVariant, HexUint, OrderRequest, OrderState, OrderView,
    RawOrder, StateLayout, TokenAmount, TriggerDirection,
};
pub use network::NetworkProfile;
pub use oracle::{DepositVerifier, HttpDepositOracle, DEPOSIT_INDEX_LAG};
pub use session::{ConnectionChange, Session, SessionConfig};
pub use views::Dashboard;
pub use workflow::{CancellationSummary, SubmitReceipt};
