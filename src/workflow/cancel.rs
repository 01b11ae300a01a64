//! Order cancellation: one transaction that refunds the full deposit.

use serde::Deserialize;

use crate::errors::{EngineError, TxPhase};
use crate::models::{Alert, AlertCode, AlertScope, AlertVariant, HexUint, TokenAmount};
use crate::session::Session;

use super::failure_alert;

const ORDER_CANCELLED_EVENT: &str = "OrderCancelled";

const MSG_CONFIRM: &str = "Please confirm the transaction in your wallet.";
const MSG_CONFIRM_DETAIL: &str =
    "This will be 1 transaction that returns 100% of your order's coins back to your wallet.";
const MSG_PROCESSING: &str = "Cancelling your order now...";
const MSG_PROCESSING_DETAIL: &str =
    "This transaction refunds 100% of your order's coins back to your wallet.";

/// Arguments of the `OrderCancelled` contract event.
#[derive(Debug, Deserialize)]
struct OrderCancelledEvent {
    #[serde(rename = "tokenInAmount")]
    token_in_amount: HexUint,
    #[serde(rename = "tokenIn")]
    token_in: String,
    owner: String,
}

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationSummary {
    pub order_id: u64,
    /// The refunded amount in display units.
    pub refund: TokenAmount,
    /// Address the refund was sent to.
    pub owner: String,
    pub tx_hash: String,
    /// Block-explorer link for the cancellation transaction.
    pub explorer_url: String,
}

impl CancellationSummary {
    /// Human-readable refund summary.
    pub fn details(&self) -> String {
        format!(
            "Refunded {} {} to \"{}\"",
            self.refund.display(),
            self.refund.symbol,
            self.owner
        )
    }
}

impl Session {
    /// Cancel an order and derive the refund summary from the mined receipt.
    ///
    /// A rejected signature or pre-mining failure changes nothing on-chain; a
    /// mined-but-reverted receipt is fatal for this attempt and surfaced with
    /// the receipt as diagnostic. A mined cancellation whose receipt lacks
    /// the `OrderCancelled` event violates a protocol invariant and is
    /// reported as [`EngineError::EventNotFound`], never as success.
    pub async fn cancel_order(&self, order_id: u64) -> Result<CancellationSummary, EngineError> {
        let scope = self.alerts.begin();
        let result = self.cancel_order_inner(order_id, &scope).await;
        if let Err(e) = &result {
            log::error!("order cancellation failed: {}", e);
        }
        self.mark_orders_stale();
        result
    }

    async fn cancel_order_inner(
        &self,
        order_id: u64,
        scope: &AlertScope<'_>,
    ) -> Result<CancellationSummary, EngineError> {
        scope.publish(Alert::new(
            AlertVariant::Primary,
            AlertCode::Faq,
            MSG_CONFIRM,
            Some(MSG_CONFIRM_DETAIL),
        ));
        let pending = self.writer.cancel_order(order_id).await.map_err(|f| {
            let err = EngineError::from_provider(f);
            scope.publish(failure_alert(&err));
            err
        })?;

        scope.publish(Alert::new(
            AlertVariant::Info,
            AlertCode::Faq,
            MSG_PROCESSING,
            Some(MSG_PROCESSING_DETAIL),
        ));
        let receipt = self.writer.await_receipt(&pending).await.map_err(|f| {
            let err = EngineError::from_provider(f);
            scope.publish(failure_alert(&err));
            err
        })?;
        if receipt.is_reverted() {
            log::error!("cancellation reverted: {:?}", receipt);
            let err = EngineError::ChainReverted {
                phase: TxPhase::Cancel,
                receipt,
            };
            scope.publish(failure_alert(&err));
            return Err(err);
        }

        let tx_hash = receipt.tx_hash.clone();
        let event = match receipt.find_event(ORDER_CANCELLED_EVENT) {
            Some(event) => event,
            None => {
                log::error!(
                    "{} event missing from receipt {:?}, contract/ABI mismatch?",
                    ORDER_CANCELLED_EVENT,
                    receipt
                );
                let err = EngineError::EventNotFound {
                    event: ORDER_CANCELLED_EVENT,
                    tx_hash,
                };
                scope.publish(failure_alert(&err));
                return Err(err);
            }
        };
        let args: OrderCancelledEvent =
            serde_json::from_value(event.args.clone()).map_err(|e| {
                log::error!(
                    "{} event args not decodable ({}): {:?}",
                    ORDER_CANCELLED_EVENT,
                    e,
                    event.args
                );
                let err = EngineError::EventNotFound {
                    event: ORDER_CANCELLED_EVENT,
                    tx_hash: tx_hash.clone(),
                };
                scope.publish(failure_alert(&err));
                err
            })?;

        let decimals = self
            .decimals
            .get_decimals(&args.token_in, self.reader.as_ref())
            .await
            .map_err(|e| {
                scope.publish(failure_alert(&e));
                e
            })?;
        let refund =
            TokenAmount::from_raw(args.token_in, args.token_in_amount.0, decimals as u32)?;

        let summary = CancellationSummary {
            order_id,
            refund,
            owner: args.owner,
            explorer_url: self.network.explorer_url_for(&tx_hash),
            tx_hash,
        };

        scope.publish(Alert::new(
            AlertVariant::Success,
            AlertCode::Faq,
            summary.details(),
            Some(&summary.explorer_url),
        ));

        Ok(summary)
    }
}
