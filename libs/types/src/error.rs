//! Engine error taxonomy
//!
//! One enum covers the whole workspace. Every failure aborts its operation
//! atomically, so callers never observe partially applied reserve or ledger
//! state. Every variant is matchable, letting hosts distinguish a
//! curve-domain failure from a balance shortfall.

use crate::identifiers::{AccountId, AssetId};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    #[error("the zero address is not a valid asset or account")]
    InvalidAsset,

    #[error("a pool needs two distinct assets, got {0} twice")]
    SameAsset(AssetId),

    #[error("pool already exists for {0}/{1}")]
    PoolExists(AssetId, AssetId),

    #[error("no pool registered for {0}/{1}")]
    PoolNotFound(AssetId, AssetId),

    #[error("caller {0} is not authorized for this operation")]
    Unauthorized(AccountId),

    #[error("slippage bound violated: computed {computed}, bound {bound}")]
    Slippage { computed: Decimal, bound: Decimal },

    #[error("insufficient funds for {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: AccountId,
        needed: Decimal,
        available: Decimal,
    },

    #[error("invalid amount {0}: amounts are positive with at most 18 fractional digits")]
    InvalidAmount(Decimal),

    #[error("insufficient liquidity: {0}")]
    InsufficientLiquidity(&'static str),

    #[error("decimal overflow: {0}")]
    Overflow(&'static str),
}
