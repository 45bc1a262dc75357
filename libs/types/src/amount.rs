//! Amount quantization at the assets' native sub-unit precision
//!
//! Every asset and share amount the engine touches is a `Decimal` carrying
//! at most 18 fractional digits, mirroring integer arithmetic over
//! 10^-18 sub-units. Divisions inside the pricing and share math truncate
//! toward zero at this scale; amounts arriving from callers with finer
//! precision are rejected rather than silently rounded.

use crate::error::ExchangeError;
use rust_decimal::Decimal;

/// Fractional digits carried by all engine amounts (10^-18 sub-units).
pub const NATIVE_SCALE: u32 = 18;

/// Truncates toward zero at [`NATIVE_SCALE`] digits.
pub fn truncate(value: Decimal) -> Decimal {
    value.trunc_with_scale(NATIVE_SCALE)
}

/// True if `value` carries no more than [`NATIVE_SCALE`] fractional digits.
pub fn is_quantized(value: Decimal) -> bool {
    value.trunc_with_scale(NATIVE_SCALE) == value
}

/// Validates an externally supplied amount that must be strictly positive.
pub fn require_positive(value: Decimal) -> Result<(), ExchangeError> {
    if value <= Decimal::ZERO || !is_quantized(value) {
        return Err(ExchangeError::InvalidAmount(value));
    }
    Ok(())
}

/// Validates an externally supplied amount or bound that may be zero.
pub fn require_non_negative(value: Decimal) -> Result<(), ExchangeError> {
    if value < Decimal::ZERO || !is_quantized(value) {
        return Err(ExchangeError::InvalidAmount(value));
    }
    Ok(())
}
