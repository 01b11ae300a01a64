//! Engine error taxonomy and the provider-failure classifier.
//!
//! Signing providers throw loosely shaped errors (a numeric JSON-RPC code, a
//! string code, a revert reason, or a bare message). Collaborators normalize
//! whatever they catch into a [`ProviderFailure`] once, at the trait
//! boundary, so classification never re-implements shape sniffing.

use thiserror::Error;

use crate::chain::TxReceipt;

/// Client-side order validation rejections. Each variant is distinguishable
/// so the caller can render a targeted message; none of these ever reach the
/// network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("order amount must be a positive number of tokens, got \"{amount}\"")]
    NonPositiveAmount { amount: String },

    #[error("swap pair must contain two different tokens, got \"{symbol}\" on both sides")]
    SamePair { symbol: String },

    #[error("trigger price must be a non-negative USD amount, got \"{price}\"")]
    InvalidTriggerPrice { price: String },

    #[error("missing required order field: {0}")]
    MissingField(&'static str),

    #[error("amount is not representable: {0}")]
    InvalidAmount(String),
}

/// The transaction a chain failure happened in. Reverts before the deposit
/// leave nothing on-chain; reverts during the deposit leave the order
/// registered but unfunded (cancellable, retryable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    CreateOrder,
    Deposit,
    Cancel,
}

impl TxPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxPhase::CreateOrder => "create-order",
            TxPhase::Deposit => "deposit",
            TxPhase::Cancel => "cancel",
        }
    }
}

/// Normalized shape of any failure raised by a signing/contract collaborator.
///
/// `code` holds the provider's error code stringified (`"ACTION_REJECTED"`,
/// `"-32002"`), `reason` the revert/rejection reason when one exists.
#[derive(Debug, Clone, Default, Error)]
#[error("{message}")]
pub struct ProviderFailure {
    pub code: Option<String>,
    pub reason: Option<String>,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            reason: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_numeric_code(mut self, code: i64) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Closed set of user-facing outcomes for provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The signer explicitly rejected the prompt. Informational, not an error.
    UserCancelled,
    /// The signer requires unlocking before it can be used.
    ProviderLocked,
    /// Anything unrecognized. Logged with the original failure, never thrown.
    Unknown,
}

impl ProviderOutcome {
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderOutcome::UserCancelled => "Transaction was cancelled",
            ProviderOutcome::ProviderLocked => "Please unlock your wallet to continue.",
            ProviderOutcome::Unknown => "We're sorry, something went wrong",
        }
    }
}

/// Map a normalized provider failure onto the outcome taxonomy.
///
/// The mapping is a static table over the reason string and the stringified
/// code; unmatched inputs fall through to [`ProviderOutcome::Unknown`] with a
/// logged warning.
pub fn classify(failure: &ProviderFailure) -> ProviderOutcome {
    for key in [failure.reason.as_deref(), failure.code.as_deref()]
        .into_iter()
        .flatten()
    {
        match key {
            "user rejected transaction" | "ACTION_REJECTED" => {
                return ProviderOutcome::UserCancelled
            }
            "-32002" => return ProviderOutcome::ProviderLocked,
            _ => {}
        }
    }

    log::warn!("unmapped provider failure: {:?}", failure);
    ProviderOutcome::Unknown
}

/// Everything a workflow can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid order request: {0}")]
    InvalidOrderRequest(#[from] ValidationError),

    #[error("failed to resolve decimals for token \"{symbol}\": {cause}")]
    TokenResolutionFailed {
        symbol: String,
        cause: anyhow::Error,
    },

    #[error("transaction was cancelled by the user")]
    UserCancelled,

    #[error("the signing provider is locked")]
    ProviderLocked,

    #[error("{} transaction {} reverted on-chain", .phase.as_str(), .receipt.tx_hash)]
    ChainReverted { phase: TxPhase, receipt: TxReceipt },

    #[error("expected contract event \"{event}\" missing from receipt of transaction {tx_hash}")]
    EventNotFound {
        event: &'static str,
        tx_hash: String,
    },

    /// The deposit-verification callout failed. Funds are safe on-chain;
    /// only the oracle's awareness of them is delayed.
    #[error("deposit confirmation callout failed: {0}")]
    OffchainConfirmationFailed(anyhow::Error),

    #[error("unclassified provider failure: {0}")]
    Unknown(ProviderFailure),
}

impl EngineError {
    /// Log a provider failure with its full original context, then map it to
    /// the matching engine error.
    pub fn from_provider(failure: ProviderFailure) -> Self {
        log::error!("provider failure: {:?}", failure);
        match classify(&failure) {
            ProviderOutcome::UserCancelled => EngineError::UserCancelled,
            ProviderOutcome::ProviderLocked => EngineError::ProviderLocked,
            ProviderOutcome::Unknown => EngineError::Unknown(failure),
        }
    }
}
