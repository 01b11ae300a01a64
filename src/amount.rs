//! Conversions between human decimal token amounts and raw on-chain units.
//!
//! All arithmetic is exact decimal arithmetic on [`Decimal`]
//! mantissa/scale pairs. Binary floating point is never used for monetary
//! amounts: a raw amount is `mantissa * 10^(decimals - scale)` computed with
//! checked integer ops, not `amount as f64 * 10f64.powi(...)`.

use rust_decimal::Decimal;

use crate::errors::ValidationError;

/// Highest decimal count representable by the underlying 96-bit decimal.
/// ERC-20 tokens top out at 18 in practice.
pub const MAX_DECIMALS: u32 = 28;

/// Parse a user-supplied amount string into an exact decimal.
pub fn parse_amount(input: &str) -> Result<Decimal, ValidationError> {
    input
        .trim()
        .parse::<Decimal>()
        .map_err(|e| ValidationError::InvalidAmount(format!("\"{}\": {}", input, e)))
}

/// Convert a human decimal amount to raw on-chain units (`amount * 10^decimals`)
/// as an integer string. Fractional dust below one raw unit is truncated.
///
/// Negative amounts are rejected; zero is allowed here (positivity is order
/// policy, enforced by request validation, not an arithmetic property).
pub fn to_raw_units(amount: Decimal, decimals: u32) -> Result<String, ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::InvalidAmount(format!(
            "negative amount {}",
            amount
        )));
    }
    if decimals > MAX_DECIMALS {
        return Err(ValidationError::InvalidAmount(format!(
            "unsupported token decimals {}",
            decimals
        )));
    }

    let amount = amount.normalize();
    let scale = amount.scale();
    let mantissa = amount.mantissa().unsigned_abs();

    let raw = if decimals >= scale {
        10u128
            .checked_pow(decimals - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
            .ok_or_else(|| {
                ValidationError::InvalidAmount(format!(
                    "{} overflows at {} decimals",
                    amount, decimals
                ))
            })?
    } else {
        // More fractional digits than the token can carry: truncate.
        let divisor = 10u128.pow(scale - decimals);
        mantissa / divisor
    };

    Ok(raw.to_string())
}

/// Convert raw on-chain units back to a canonical human decimal string
/// (`raw * 10^-decimals`, trailing zeros stripped).
///
/// Round-trips with [`to_raw_units`]: `to_raw_units(to_display_amount(r, d), d)`
/// returns `r` for every representable pair.
pub fn to_display_amount(raw: u128, decimals: u32) -> Result<String, ValidationError> {
    if decimals > MAX_DECIMALS {
        return Err(ValidationError::InvalidAmount(format!(
            "unsupported token decimals {}",
            decimals
        )));
    }
    let signed = i128::try_from(raw).map_err(|_| {
        ValidationError::InvalidAmount(format!("raw amount {} out of range", raw))
    })?;
    let value = Decimal::try_from_i128_with_scale(signed, decimals).map_err(|e| {
        ValidationError::InvalidAmount(format!("raw amount {} out of range: {}", raw, e))
    })?;

    Ok(value.normalize().to_string())
}
