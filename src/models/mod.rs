pub mod alert;
pub mod order;

pub use alert::{Alert, AlertCode, AlertScope, AlertSlot, AlertVariant, HelpLink};
pub use order::{
    anon_order_id, HexUint, OrderRequest, OrderState, OrderView, RawOrder, StateLayout,
    TokenAmount, TriggerDirection,
};
