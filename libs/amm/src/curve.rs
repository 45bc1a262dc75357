//! Constant-product curve with fee retention
//!
//! The exact-input side is the standard `x*y=k` curve with the fee deducted
//! from the input before pricing; the fee portion still lands in the input
//! reserve, so the invariant product grows on every completed trade.
//!
//! The exact-output side quotes `reserveIn*amountOut/(reserveOut-amountOut)`
//! marked up linearly by `(1 + fee)`. That markup is *not* the algebraic
//! inverse of the exact-input adjustment (the inverse would divide by
//! `(1 - fee)`); buying and selling the same notional therefore price
//! slightly differently. This is the observed contract of the system and is
//! preserved exactly; do not symmetrize it.

use pairswap_types::{amount, ExchangeError};
use rust_decimal::Decimal;

/// Basis-point denominator (10 000 = 100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Constant-product pricing functions.
///
/// All quotes are pure: given the same reserves and arguments they return
/// the same result and touch nothing.
pub struct CurveMath;

impl CurveMath {
    /// Quote for selling an exact input amount.
    ///
    /// # Arguments
    /// * `amount_in` - amount of the input asset the caller sells
    /// * `reserve_in` - pool reserve of the input asset
    /// * `reserve_out` - pool reserve of the output asset
    /// * `fee_bps` - fee in basis points (30 = 0.3%)
    ///
    /// # Returns
    /// The output amount:
    /// `reserve_out - trunc(reserve_in*reserve_out / (reserve_in + effective_in))`
    /// with `effective_in = trunc(amount_in * (1 - fee))`. The subtraction
    /// form matches sub-unit integer arithmetic digit for digit.
    pub fn quote_exact_in(
        amount_in: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
        fee_bps: u32,
    ) -> Result<Decimal, ExchangeError> {
        amount::require_positive(amount_in)?;
        Self::require_seeded(reserve_in, reserve_out)?;

        let effective_in = amount::truncate(
            amount_in
                .checked_mul(Self::fee_multiplier(fee_bps)?)
                .ok_or(ExchangeError::Overflow("fee-adjusted input"))?,
        );

        let product = reserve_in
            .checked_mul(reserve_out)
            .ok_or(ExchangeError::Overflow("reserve product"))?;
        let denominator = reserve_in
            .checked_add(effective_in)
            .ok_or(ExchangeError::Overflow("post-trade input reserve"))?;
        let retained = amount::truncate(
            product
                .checked_div(denominator)
                .ok_or(ExchangeError::Overflow("curve division"))?,
        );

        // retained <= reserve_out because denominator >= reserve_in
        Ok(reserve_out - retained)
    }

    /// Quote for buying an exact output amount.
    ///
    /// Fails with [`ExchangeError::InsufficientLiquidity`] when the request
    /// reaches or exceeds the output reserve. See the module docs for why
    /// the `(1 + fee)` markup must stay linear.
    pub fn quote_exact_out(
        amount_out: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
        fee_bps: u32,
    ) -> Result<Decimal, ExchangeError> {
        amount::require_positive(amount_out)?;
        Self::require_seeded(reserve_in, reserve_out)?;

        if amount_out >= reserve_out {
            return Err(ExchangeError::InsufficientLiquidity(
                "requested output reaches the entire reserve",
            ));
        }

        let numerator = reserve_in
            .checked_mul(amount_out)
            .ok_or(ExchangeError::Overflow("exact-out numerator"))?;
        let raw_in = amount::truncate(
            numerator
                .checked_div(reserve_out - amount_out)
                .ok_or(ExchangeError::Overflow("exact-out division"))?,
        );

        let quoted_in = amount::truncate(
            raw_in
                .checked_mul(Self::fee_markup(fee_bps)?)
                .ok_or(ExchangeError::Overflow("fee markup"))?,
        );

        Ok(quoted_in)
    }

    /// `(10000 - fee_bps) / 10000`, e.g. 0.997 for 30 bps.
    fn fee_multiplier(fee_bps: u32) -> Result<Decimal, ExchangeError> {
        let complement = BPS_DENOMINATOR
            .checked_sub(fee_bps)
            .ok_or(ExchangeError::Overflow("fee complement"))?;
        if complement == 0 {
            return Err(ExchangeError::Overflow("fee complement"));
        }
        Ok(Decimal::from(complement) / Decimal::from(BPS_DENOMINATOR))
    }

    /// `(10000 + fee_bps) / 10000`, e.g. 1.003 for 30 bps.
    fn fee_markup(fee_bps: u32) -> Result<Decimal, ExchangeError> {
        let marked = BPS_DENOMINATOR
            .checked_add(fee_bps)
            .ok_or(ExchangeError::Overflow("fee markup"))?;
        Ok(Decimal::from(marked) / Decimal::from(BPS_DENOMINATOR))
    }

    fn require_seeded(reserve_in: Decimal, reserve_out: Decimal) -> Result<(), ExchangeError> {
        if reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
            return Err(ExchangeError::InsufficientLiquidity(
                "pool reserves are empty",
            ));
        }
        Ok(())
    }
}
