//! The two transaction workflows: order submission and order cancellation.
//!
//! Both are strictly sequential within one invocation (every step depends on
//! the previous step's on-chain effect), and both publish a distinct alert
//! around every step, because alerts are the only channel the host learns
//! about multi-minute, multi-transaction progress through.

pub mod cancel;
pub mod submit;

pub use cancel::CancellationSummary;
pub use submit::SubmitReceipt;

use rust_decimal::Decimal;

use crate::errors::{EngineError, ProviderOutcome, ValidationError};
use crate::models::{Alert, AlertCode, AlertVariant, OrderRequest};

/// Client-side order validation. Rejections never reach the network and each
/// carries a distinguishable reason.
pub fn validate(request: &OrderRequest) -> Result<(), ValidationError> {
    if request.token_in_symbol.is_empty() {
        return Err(ValidationError::MissingField("tokenInSymbol"));
    }
    if request.token_out_symbol.is_empty() {
        return Err(ValidationError::MissingField("tokenOutSymbol"));
    }
    if request.token_in_decimal_amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount {
            amount: request.token_in_decimal_amount.to_string(),
        });
    }
    if request.token_in_symbol == request.token_out_symbol {
        return Err(ValidationError::SamePair {
            symbol: request.token_in_symbol.clone(),
        });
    }
    if request.trigger_price.trim().is_empty() {
        return Err(ValidationError::MissingField("triggerPrice"));
    }
    match request.trigger_price.trim().parse::<Decimal>() {
        Ok(price) if !price.is_sign_negative() => Ok(()),
        _ => Err(ValidationError::InvalidTriggerPrice {
            price: request.trigger_price.clone(),
        }),
    }
}

/// Targeted warning alert for a validation rejection.
pub(crate) fn validation_alert(reason: &ValidationError, request: &OrderRequest) -> Alert {
    let (primary, secondary) = match reason {
        ValidationError::MissingField("tokenInSymbol") => {
            ("Please select a token to swap from.".to_string(), None)
        }
        ValidationError::MissingField("tokenOutSymbol") => {
            ("Please select a token to swap to.".to_string(), None)
        }
        ValidationError::MissingField(field) => {
            (format!("Please fill in the \"{}\" field.", field), None)
        }
        ValidationError::NonPositiveAmount { amount } => (
            "Please select a valid number of tokens to swap.".to_string(),
            Some(format!(
                "Your order is currently configured to swap \"{}\" tokens",
                amount
            )),
        ),
        ValidationError::SamePair { .. } => (
            "Please select 2 different pairs of tokens to swap.".to_string(),
            Some(format!(
                "Your order is currently configured to swap \"{}\" to \"{}\"",
                request.token_in_symbol, request.token_out_symbol
            )),
        ),
        ValidationError::InvalidTriggerPrice { price } => (
            "Please select a valid trigger price.".to_string(),
            Some(format!(
                "Your order is currently configured to trigger at \"{} $USD\"",
                price
            )),
        ),
        ValidationError::InvalidAmount(detail) => (
            "Please select a valid number of tokens to swap.".to_string(),
            Some(detail.clone()),
        ),
    };

    Alert::new(
        AlertVariant::Warning,
        AlertCode::Faq,
        primary,
        secondary.as_deref(),
    )
}

/// Generic user-facing alert for a classified engine failure.
pub(crate) fn failure_alert(error: &EngineError) -> Alert {
    let message = match error {
        EngineError::UserCancelled => ProviderOutcome::UserCancelled.user_message(),
        EngineError::ProviderLocked => ProviderOutcome::ProviderLocked.user_message(),
        _ => ProviderOutcome::Unknown.user_message(),
    };
    Alert::new(AlertVariant::Secondary, AlertCode::Faq, message, None)
}
