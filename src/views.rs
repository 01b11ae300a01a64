//! Builds the anonymized, display-ready order list from raw contract tuples.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::amount;
use crate::chain::ChainReader;
use crate::decimals::TokenDecimalsCache;
use crate::errors::EngineError;
use crate::models::{anon_order_id, OrderState, OrderView, RawOrder, StateLayout, TriggerDirection};

/// Everything the dashboard needs from one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub orders: Vec<OrderView>,
    /// True when any order is waiting for its deposit transaction.
    pub deposit_pending: bool,
}

impl Dashboard {
    pub fn from_views(orders: Vec<OrderView>) -> Self {
        let deposit_pending = orders
            .iter()
            .any(|o| o.status == OrderState::PendingDeposit.label());
        Self {
            orders,
            deposit_pending,
        }
    }
}

/// Map a batch of raw order tuples to display projections.
///
/// Decimals are resolved once per distinct `tokenIn` symbol, not once per
/// order: N orders over K symbols cost at most K contract lookups. Records
/// with out-of-range direction/state enums are logged and skipped rather than
/// poisoning the whole dashboard.
pub async fn build_order_views(
    raw_orders: &[RawOrder],
    layout: StateLayout,
    cache: &TokenDecimalsCache,
    reader: &dyn ChainReader,
) -> Result<Vec<OrderView>, EngineError> {
    let mut decimals_by_symbol: HashMap<&str, u8> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for order in raw_orders {
        if seen.insert(order.token_in.as_str()) {
            let decimals = cache.get_decimals(&order.token_in, reader).await?;
            decimals_by_symbol.insert(order.token_in.as_str(), decimals);
        }
    }

    let mut views = Vec::with_capacity(raw_orders.len());
    for order in raw_orders {
        let direction = match TriggerDirection::from_u8(order.direction) {
            Some(d) => d,
            None => {
                log::warn!(
                    "order {} has unknown direction {}, skipping",
                    order.id.0,
                    order.direction
                );
                continue;
            }
        };
        let state = match layout.decode(order.order_state) {
            Some(s) => s,
            None => {
                log::warn!(
                    "order {} has unknown state {} under {:?}, skipping",
                    order.id.0,
                    order.order_state,
                    layout
                );
                continue;
            }
        };

        let decimals = decimals_by_symbol[order.token_in.as_str()];
        let token_in_amount =
            match amount::to_display_amount(order.token_in_amount.0, decimals as u32) {
                Ok(display) => display,
                Err(e) => {
                    log::warn!("order {} amount not displayable: {}", order.id.0, e);
                    continue;
                }
            };

        let order_id = order.id.0 as u64;
        views.push(OrderView {
            order_id,
            anon_order_id: anon_order_id(&order.owner, order_id),
            token_in_amount,
            token_in: order.token_in.clone(),
            token_out: order.token_out.clone(),
            direction: direction.glyph(),
            trigger_price: order.token_in_trigger_price.clone(),
            status: state.label(),
        });
    }

    Ok(views)
}
