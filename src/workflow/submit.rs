//! Order submission: validate → connect wallet → register the order →
//! deposit the funds → notify the deposit-verification oracle.
//!
//! Registration and deposit are two separate transactions by protocol
//! design: declaring intent never moves funds. The split is a self-custody
//! property, not an implementation accident: an order abandoned after
//! registration holds nothing and can be cancelled by its owner at any time.

use crate::amount;
use crate::chain::NewOrderCall;
use crate::errors::{EngineError, TxPhase};
use crate::models::{Alert, AlertCode, AlertScope, AlertVariant, OrderRequest};
use crate::session::Session;

use super::{failure_alert, validate, validation_alert};

const MSG_CONNECT_WALLET: &str = "Please connect your wallet to add new orders.";
const MSG_CONFIRM_TX_1: &str = "Please confirm transaction [1] of [2] in your wallet.";
const MSG_CONFIRM_TX_1_DETAIL: &str = "This will add your order to the smart contract. This \
    transaction creates data and does not transfer any coins yet.";
const MSG_TX_PROCESSING: &str = "Processing transaction...";
const MSG_TX_PROCESSING_DETAIL: &str = "Awaiting network approval of the order registration.";
const MSG_CONFIRM_TX_2: &str = "Please confirm transaction [2] of [2] in your wallet.";
const MSG_CONFIRM_TX_2_DETAIL: &str = "This deposits the coins for your order to swap \
    automatically. Untriggered orders can be cancelled at any time to get the coins sent back.";
const MSG_FINALIZING: &str = "Finalizing your order...";
const MSG_FINALIZING_DETAIL: &str = "Awaiting network approval of the deposit.";
const MSG_DEPOSIT_REVERTED: &str = "The deposit transaction was rejected by the network.";
const MSG_DEPOSIT_REVERTED_DETAIL: &str = "Your order is registered but not funded. You can \
    retry the deposit or cancel the order at any time.";
const MSG_ORDER_LIVE: &str =
    "Your order is now live, and will be triggered when your conditions are met.";
const MSG_ORDER_LIVE_DETAIL: &str =
    "Deposits can be refunded at any time by cancelling the order.";
const MSG_ORACLE_WARN: &str =
    "Your order is funded, but deposit verification has not been notified yet.";
const MSG_ORACLE_WARN_DETAIL: &str =
    "Your coins are safe on-chain; the oracle will pick the deposit up on its own.";

/// Outcome of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// The wallet account that owns the new order.
    pub account: String,
    pub order_tx_hash: String,
    pub deposit_tx_hash: String,
    /// `None` when the session has no oracle configured; `Some(false)` when
    /// the callout failed (non-fatal; the order is funded regardless).
    pub oracle_notified: Option<bool>,
}

impl Session {
    /// Run the full order-submission workflow.
    ///
    /// On any error the workflow stops where it is; no step is rolled back.
    /// A failure before the deposit leaves nothing on-chain, a failure during
    /// the deposit leaves the order registered but unfunded. Either way the
    /// orders-stale signal fires so the dashboard re-reads the contract.
    pub async fn submit_order(&self, request: &OrderRequest) -> Result<SubmitReceipt, EngineError> {
        let scope = self.alerts.begin();
        let result = self.submit_order_inner(request, &scope).await;
        if let Err(e) = &result {
            log::error!("order submission aborted: {}", e);
        }
        self.mark_orders_stale();
        result
    }

    async fn submit_order_inner(
        &self,
        request: &OrderRequest,
        scope: &AlertScope<'_>,
    ) -> Result<SubmitReceipt, EngineError> {
        if let Err(reason) = validate(request) {
            scope.publish(validation_alert(&reason, request));
            return Err(reason.into());
        }
        scope.clear();

        let account = self.connect_wallet(scope).await?;

        // Resolve the token before anything is signed: the raw amount in the
        // registration call already needs the token's decimals.
        let token_address = self
            .reader
            .token_address(&request.token_in_symbol)
            .await
            .map_err(|e| {
                let err = EngineError::TokenResolutionFailed {
                    symbol: request.token_in_symbol.clone(),
                    cause: anyhow::Error::new(e),
                };
                scope.publish(failure_alert(&err));
                err
            })?;
        let decimals = self
            .decimals
            .get_decimals(&request.token_in_symbol, self.reader.as_ref())
            .await
            .map_err(|e| {
                scope.publish(failure_alert(&e));
                e
            })?;
        let raw_amount = amount::to_raw_units(request.token_in_decimal_amount, decimals as u32)
            .map_err(|reason| {
                scope.publish(validation_alert(&reason, request));
                EngineError::from(reason)
            })?;

        // Transaction 1: register the order. Creates data, moves no funds.
        scope.publish(Alert::new(
            AlertVariant::Primary,
            AlertCode::WhatIsEthTx,
            MSG_CONFIRM_TX_1,
            Some(MSG_CONFIRM_TX_1_DETAIL),
        ));
        let call = NewOrderCall {
            token_in: request.token_in_symbol.clone(),
            token_out: request.token_out_symbol.clone(),
            trigger_price: request.trigger_price.clone(),
            direction: request.trigger_direction.as_u8(),
            raw_amount: raw_amount.clone(),
        };
        let pending_order = self.writer.add_new_order(&call).await.map_err(|f| {
            let err = EngineError::from_provider(f);
            scope.publish(failure_alert(&err));
            err
        })?;

        scope.publish(Alert::new(
            AlertVariant::Info,
            AlertCode::HowOrdersAdded,
            MSG_TX_PROCESSING,
            Some(MSG_TX_PROCESSING_DETAIL),
        ));
        let order_receipt = self.writer.await_receipt(&pending_order).await.map_err(|f| {
            let err = EngineError::from_provider(f);
            scope.publish(failure_alert(&err));
            err
        })?;
        if order_receipt.is_reverted() {
            log::error!("order registration reverted: {:?}", order_receipt);
            let err = EngineError::ChainReverted {
                phase: TxPhase::CreateOrder,
                receipt: order_receipt,
            };
            scope.publish(failure_alert(&err));
            return Err(err);
        }

        // Transaction 2: fund the order with an ERC-20 transfer to the
        // contract.
        scope.publish(Alert::new(
            AlertVariant::Primary,
            AlertCode::CreateOrderMultiTx,
            MSG_CONFIRM_TX_2,
            Some(MSG_CONFIRM_TX_2_DETAIL),
        ));
        let pending_deposit = self
            .writer
            .transfer(&token_address, &self.network.orders_contract, &raw_amount)
            .await
            .map_err(|f| {
                let err = EngineError::from_provider(f);
                scope.publish(failure_alert(&err));
                err
            })?;

        scope.publish(Alert::new(
            AlertVariant::Info,
            AlertCode::SelfCustody,
            MSG_FINALIZING,
            Some(MSG_FINALIZING_DETAIL),
        ));
        let deposit_receipt = self
            .writer
            .await_receipt(&pending_deposit)
            .await
            .map_err(|f| {
                let err = EngineError::from_provider(f);
                scope.publish(failure_alert(&err));
                err
            })?;
        if deposit_receipt.is_reverted() {
            log::error!("deposit reverted: {:?}", deposit_receipt);
            scope.publish(Alert::new(
                AlertVariant::Warning,
                AlertCode::SelfCustody,
                MSG_DEPOSIT_REVERTED,
                Some(MSG_DEPOSIT_REVERTED_DETAIL),
            ));
            return Err(EngineError::ChainReverted {
                phase: TxPhase::Deposit,
                receipt: deposit_receipt,
            });
        }

        let oracle_notified = self.notify_oracle(&account, scope).await;
        if oracle_notified != Some(false) {
            scope.publish(Alert::new(
                AlertVariant::Success,
                AlertCode::OrderLive,
                MSG_ORDER_LIVE,
                Some(MSG_ORDER_LIVE_DETAIL),
            ));
        }

        Ok(SubmitReceipt {
            account,
            order_tx_hash: order_receipt.tx_hash,
            deposit_tx_hash: deposit_receipt.tx_hash,
            oracle_notified,
        })
    }

    /// Ensure a wallet account is connected, prompting the user when none is.
    async fn connect_wallet(&self, scope: &AlertScope<'_>) -> Result<String, EngineError> {
        let mut accounts = self
            .wallet
            .accounts()
            .await
            .map_err(EngineError::from_provider)?;

        if accounts.is_empty() {
            scope.publish(Alert::new(
                AlertVariant::Primary,
                AlertCode::Faq,
                MSG_CONNECT_WALLET,
                None,
            ));
            accounts = self.wallet.request_accounts().await.map_err(|f| {
                let err = EngineError::from_provider(f);
                scope.publish(failure_alert(&err));
                err
            })?;
        }

        match accounts.into_iter().next() {
            Some(account) => Ok(account),
            None => {
                let err = EngineError::UserCancelled;
                scope.publish(failure_alert(&err));
                Err(err)
            }
        }
    }

    /// Tell the verification oracle about the mined deposit, after waiting
    /// out the indexer lag. Failure is reported, never fatal.
    async fn notify_oracle(&self, account: &str, scope: &AlertScope<'_>) -> Option<bool> {
        let oracle = self.oracle.as_ref()?;

        tokio::time::sleep(self.config.deposit_confirm_delay).await;
        match oracle.confirm_deposit(account).await {
            Ok(()) => Some(true),
            Err(e) => {
                log::error!("deposit confirmation callout failed: {:#}", e);
                scope.publish(Alert::new(
                    AlertVariant::Warning,
                    AlertCode::HowDepositVerified,
                    MSG_ORACLE_WARN,
                    Some(MSG_ORACLE_WARN_DETAIL),
                ));
                Some(false)
            }
        }
    }
}
