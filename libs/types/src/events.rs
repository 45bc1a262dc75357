//! Economic events emitted by the registry
//!
//! Observers (typically a UI refreshing balances) consume these from the
//! registry's drainable log. Amounts are the amounts actually moved, after
//! ratio matching and truncation, not the caller's requested figures.

use crate::identifiers::{AccountId, AssetId, PoolId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    PoolCreated {
        creator: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        pool: PoolId,
    },
    Swapped {
        account: AccountId,
        asset_in: AssetId,
        amount_in: Decimal,
        asset_out: AssetId,
        amount_out: Decimal,
    },
    LiquidityProvided {
        account: AccountId,
        asset_a: AssetId,
        amount_a: Decimal,
        asset_b: AssetId,
        amount_b: Decimal,
    },
    LiquidityWithdrawn {
        account: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        shares: Decimal,
    },
}
