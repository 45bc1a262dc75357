//! Proportional liquidity-share accounting
//!
//! Deposits are ratio-matched against current reserves: the side that would
//! overshoot the pool ratio is scaled back, never the reserves. Shares mint
//! and redeem pro rata against total supply, truncating at sub-unit
//! precision in the pool's favour.

use pairswap_types::{amount, ExchangeError};
use rust_decimal::Decimal;

/// Share arithmetic for liquidity provision and withdrawal.
pub struct ShareMath;

impl ShareMath {
    /// Ratio-matches a desired deposit `(desired_a, desired_b)` against
    /// reserves, returning the amounts actually taken.
    ///
    /// `optimal_b = trunc(desired_a * reserve_b / reserve_a)`; if that fits
    /// within `desired_b` the deposit is `(desired_a, optimal_b)`, otherwise
    /// the A side is scaled back symmetrically.
    pub fn matched_deposit(
        desired_a: Decimal,
        desired_b: Decimal,
        reserve_a: Decimal,
        reserve_b: Decimal,
    ) -> Result<(Decimal, Decimal), ExchangeError> {
        amount::require_positive(desired_a)?;
        amount::require_positive(desired_b)?;
        Self::require_seeded(reserve_a, reserve_b)?;

        let optimal_b = amount::truncate(
            desired_a
                .checked_mul(reserve_b)
                .ok_or(ExchangeError::Overflow("counterpart numerator"))?
                .checked_div(reserve_a)
                .ok_or(ExchangeError::Overflow("counterpart division"))?,
        );
        if optimal_b <= desired_b {
            return Ok((desired_a, optimal_b));
        }

        let optimal_a = amount::truncate(
            desired_b
                .checked_mul(reserve_a)
                .ok_or(ExchangeError::Overflow("counterpart numerator"))?
                .checked_div(reserve_b)
                .ok_or(ExchangeError::Overflow("counterpart division"))?,
        );
        Ok((optimal_a, desired_b))
    }

    /// Shares minted for a matched deposit:
    /// `trunc(total_shares * used_a / reserve_a)`.
    ///
    /// By construction of [`ShareMath::matched_deposit`] this equals the
    /// B-side computation up to truncation.
    pub fn shares_for_deposit(
        total_shares: Decimal,
        used_a: Decimal,
        reserve_a: Decimal,
    ) -> Result<Decimal, ExchangeError> {
        if reserve_a <= Decimal::ZERO {
            return Err(ExchangeError::InsufficientLiquidity(
                "pool reserves are empty",
            ));
        }
        Ok(amount::truncate(
            total_shares
                .checked_mul(used_a)
                .ok_or(ExchangeError::Overflow("share mint numerator"))?
                .checked_div(reserve_a)
                .ok_or(ExchangeError::Overflow("share mint division"))?,
        ))
    }

    /// Reserve value of `shares` against `total_shares`:
    /// `(trunc(reserve_a*shares/total), trunc(reserve_b*shares/total))`.
    ///
    /// Returns `(0, 0)` for zero shares.
    pub fn redeem_value(
        reserve_a: Decimal,
        reserve_b: Decimal,
        shares: Decimal,
        total_shares: Decimal,
    ) -> Result<(Decimal, Decimal), ExchangeError> {
        amount::require_non_negative(shares)?;
        if shares.is_zero() {
            return Ok((Decimal::ZERO, Decimal::ZERO));
        }
        if total_shares <= Decimal::ZERO {
            return Err(ExchangeError::InsufficientLiquidity(
                "no shares outstanding",
            ));
        }

        let value_a = amount::truncate(
            reserve_a
                .checked_mul(shares)
                .ok_or(ExchangeError::Overflow("redeem numerator"))?
                .checked_div(total_shares)
                .ok_or(ExchangeError::Overflow("redeem division"))?,
        );
        let value_b = amount::truncate(
            reserve_b
                .checked_mul(shares)
                .ok_or(ExchangeError::Overflow("redeem numerator"))?
                .checked_div(total_shares)
                .ok_or(ExchangeError::Overflow("redeem division"))?,
        );
        Ok((value_a, value_b))
    }

    fn require_seeded(reserve_a: Decimal, reserve_b: Decimal) -> Result<(), ExchangeError> {
        if reserve_a <= Decimal::ZERO || reserve_b <= Decimal::ZERO {
            return Err(ExchangeError::InsufficientLiquidity(
                "pool reserves are empty",
            ));
        }
        Ok(())
    }
}
