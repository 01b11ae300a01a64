use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::amount;
use crate::errors::ValidationError;

/// Price-threshold direction an order triggers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerDirection {
    Below,
    Equal,
    Above,
}

impl TriggerDirection {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(TriggerDirection::Below),
            1 => Some(TriggerDirection::Equal),
            2 => Some(TriggerDirection::Above),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            TriggerDirection::Below => 0,
            TriggerDirection::Equal => 1,
            TriggerDirection::Above => 2,
        }
    }

    /// Display glyph used on the dashboard, e.g. `> $0.02`.
    pub fn glyph(&self) -> &'static str {
        match self {
            TriggerDirection::Below => "<",
            TriggerDirection::Equal => "=",
            TriggerDirection::Above => ">",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerDirection::Below => "below",
            TriggerDirection::Equal => "equal to",
            TriggerDirection::Above => "above",
        }
    }
}

/// Lifecycle state of an on-chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    Untriggered,
    PendingDeposit,
    Executed,
    Cancelled,
}

impl OrderState {
    pub fn label(&self) -> &'static str {
        match self {
            OrderState::Untriggered => "Untriggered",
            OrderState::PendingDeposit => "Pending deposit",
            OrderState::Executed => "Executed",
            OrderState::Cancelled => "Cancelled",
        }
    }
}

/// How the deployed contract numbers its order states. The current contract
/// tracks a PendingDeposit state between registration and funding; the legacy
/// deployment goes straight from Untriggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateLayout {
    ThreeState,
    FourState,
}

impl StateLayout {
    pub fn decode(&self, raw: u8) -> Option<OrderState> {
        match (self, raw) {
            (StateLayout::FourState, 0) => Some(OrderState::Untriggered),
            (StateLayout::FourState, 1) => Some(OrderState::PendingDeposit),
            (StateLayout::FourState, 2) => Some(OrderState::Executed),
            (StateLayout::FourState, 3) => Some(OrderState::Cancelled),
            (StateLayout::ThreeState, 0) => Some(OrderState::Untriggered),
            (StateLayout::ThreeState, 1) => Some(OrderState::Executed),
            (StateLayout::ThreeState, 2) => Some(OrderState::Cancelled),
            _ => None,
        }
    }
}

impl Default for StateLayout {
    fn default() -> Self {
        StateLayout::FourState
    }
}

/// An exact decimal quantity tagged with its token symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub symbol: String,
    pub value: Decimal,
}

impl TokenAmount {
    pub fn new(symbol: impl Into<String>, value: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            value,
        }
    }

    /// Build from raw on-chain units and the token's decimal count.
    pub fn from_raw(
        symbol: impl Into<String>,
        raw: u128,
        decimals: u32,
    ) -> Result<Self, ValidationError> {
        let display = amount::to_display_amount(raw, decimals)?;
        let value = display
            .parse()
            .map_err(|e| ValidationError::InvalidAmount(format!("{}: {}", display, e)))?;
        Ok(Self {
            symbol: symbol.into(),
            value,
        })
    }

    /// Canonical display string, e.g. `"0.001"`.
    pub fn display(&self) -> String {
        self.value.normalize().to_string()
    }

    pub fn to_raw_units(&self, decimals: u32) -> Result<String, ValidationError> {
        amount::to_raw_units(self.value, decimals)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.display(), self.symbol)
    }
}

/// The user's intent to create an order, as collected by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub token_in_decimal_amount: Decimal,
    pub token_in_symbol: String,
    pub token_out_symbol: String,
    pub trigger_direction: TriggerDirection,
    /// USD threshold, kept as the string the contract stores.
    pub trigger_price: String,
}

/// An unsigned quantity as contract tuples encode it: either a
/// `{"_hex": "0x3e8"}` object, a bare `"0x…"`/decimal string, or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexUint(pub u128);

impl<'de> Deserialize<'de> for HexUint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Obj {
                #[serde(rename = "_hex")]
                hex: String,
            },
            Num(u64),
            Str(String),
        }

        fn parse<E: serde::de::Error>(s: &str) -> Result<u128, E> {
            let s = s.trim();
            if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                u128::from_str_radix(stripped, 16)
            } else {
                s.parse::<u128>()
            }
            .map_err(|e| E::custom(format!("invalid quantity \"{}\": {}", s, e)))
        }

        match Repr::deserialize(deserializer)? {
            Repr::Obj { hex } => parse(&hex).map(HexUint),
            Repr::Str(s) => parse(&s).map(HexUint),
            Repr::Num(n) => Ok(HexUint(n as u128)),
        }
    }
}

impl Serialize for HexUint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

/// An order tuple exactly as the contract returns it from
/// `getOrdersByAddress`. Owned by the contract; the client never mutates it,
/// only submits transactions that make the contract transition it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrder {
    pub id: HexUint,
    pub owner: String,
    #[serde(rename = "tokenInAmount")]
    pub token_in_amount: HexUint,
    #[serde(rename = "tokenIn")]
    pub token_in: String,
    #[serde(rename = "tokenOut")]
    pub token_out: String,
    #[serde(rename = "tokenInTriggerPrice")]
    pub token_in_trigger_price: String,
    pub direction: u8,
    #[serde(rename = "orderState")]
    pub order_state: u8,
}

/// Display projection of a [`RawOrder`]. Rebuilt wholesale on every dashboard
/// refresh; the contract stays the single source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub order_id: u64,
    /// Owner-address tail + numeric id. A display reference only; it is
    /// neither unique nor collision resistant.
    pub anon_order_id: String,
    pub token_in_amount: String,
    pub token_in: String,
    pub token_out: String,
    pub direction: &'static str,
    pub trigger_price: String,
    pub status: &'static str,
}

/// Anonymized display id: the last 4 characters of the owner address
/// concatenated with the numeric order id.
pub fn anon_order_id(owner: &str, order_id: u64) -> String {
    let tail = &owner[owner.len().saturating_sub(4)..];
    format!("{}{}", tail, order_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_uint_wire_shapes() {
        let from_obj: HexUint = serde_json::from_str(r#"{"_hex": "0x3e8"}"#).unwrap();
        assert_eq!(from_obj, HexUint(1000));

        let from_hex_str: HexUint = serde_json::from_str(r#""0x0de0b6b3a7640000""#).unwrap();
        assert_eq!(from_hex_str, HexUint(1_000_000_000_000_000_000));

        let from_dec_str: HexUint = serde_json::from_str(r#""1000""#).unwrap();
        assert_eq!(from_dec_str, HexUint(1000));

        let from_num: HexUint = serde_json::from_str("7").unwrap();
        assert_eq!(from_num, HexUint(7));

        assert!(serde_json::from_str::<HexUint>(r#""0xzz""#).is_err());
    }

    #[test]
    fn test_raw_order_from_contract_tuple() {
        let raw: RawOrder = serde_json::from_str(
            r#"{
                "id": {"_hex": "0x2a"},
                "owner": "0xAF3e8346F1B57B0915851dBA3a1CDE65CF8dF522",
                "tokenInAmount": {"_hex": "0x38d7ea4c68000"},
                "tokenIn": "UNI",
                "tokenOut": "WETH",
                "tokenInTriggerPrice": "0.02",
                "direction": 2,
                "orderState": 0
            }"#,
        )
        .unwrap();

        assert_eq!(raw.id, HexUint(42));
        assert_eq!(raw.token_in_amount, HexUint(1_000_000_000_000_000));
        assert_eq!(raw.token_in, "UNI");
        assert_eq!(raw.direction, 2);
    }

    #[test]
    fn test_anon_order_id_is_owner_tail_plus_id() {
        assert_eq!(
            anon_order_id("0xAF3e8346F1B57B0915851dBA3a1CDE65CF8dF522", 42),
            "F52242"
        );
        // Degenerate short owner must not panic.
        assert_eq!(anon_order_id("ab", 1), "ab1");
    }

    #[test]
    fn test_state_layouts() {
        assert_eq!(
            StateLayout::FourState.decode(1),
            Some(OrderState::PendingDeposit)
        );
        assert_eq!(StateLayout::ThreeState.decode(1), Some(OrderState::Executed));
        assert_eq!(StateLayout::ThreeState.decode(3), None);
        assert_eq!(StateLayout::FourState.decode(9), None);
    }

    #[test]
    fn test_token_amount_display() {
        let refund = TokenAmount::from_raw("UNI", 1000, 18).unwrap();
        assert_eq!(refund.display(), "0.000000000000001");
        assert_eq!(refund.to_string(), "0.000000000000001 UNI");
    }
}
