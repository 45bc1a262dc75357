//! Liquidity pool: oriented pricing, swap execution, share accounting
//!
//! A pool fixes its two assets in creation order and never reorders them.
//! The registry translates caller intent onto that order (an explicit
//! [`Orientation`], never address sorting) and is the only caller admitted
//! through the mutating entry points.
//!
//! Atomicity discipline: external transfers run first; reserves and shares
//! mutate only after every transfer succeeded. When the second of a pair of
//! transfers fails, the first is unwound before the error propagates, so
//! neither the ledger nor the pool ever shows a half-applied operation.

use crate::ledger::AssetLedger;
use crate::share_ledger::ShareLedger;
use pairswap_amm::{CurveMath, ShareMath};
use pairswap_types::{amount, AccountId, AssetId, ExchangeError, PoolId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which side of the pool's fixed asset order a caller's input occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The caller's input asset is the pool's first asset.
    Forward,
    /// The caller's input asset is the pool's second asset.
    Reversed,
}

/// Amounts actually moved by a swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub asset_in: AssetId,
    pub amount_in: Decimal,
    pub asset_out: AssetId,
    pub amount_out: Decimal,
}

/// Amounts actually taken by a liquidity provision, in pool asset order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionReceipt {
    pub asset_a: AssetId,
    pub amount_a: Decimal,
    pub asset_b: AssetId,
    pub amount_b: Decimal,
    pub shares_minted: Decimal,
}

/// Amounts paid out by a withdrawal, in pool asset order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub asset_a: AssetId,
    pub amount_a: Decimal,
    pub asset_b: AssetId,
    pub amount_b: Decimal,
    pub shares_burned: Decimal,
    /// True when this withdrawal burned the last outstanding share; the
    /// registry deregisters the pair in response.
    pub drained: bool,
}

/// A two-asset constant-product pool with fee retention.
#[derive(Debug, Clone)]
pub struct LiquidityPool {
    id: PoolId,
    /// The pool's own account on the external asset ledger; reserves mirror
    /// this account's holdings.
    custody: AccountId,
    /// The registry that created the pool; sole admitted mutator.
    authorized_caller: AccountId,
    asset_a: AssetId,
    asset_b: AssetId,
    reserve_a: Decimal,
    reserve_b: Decimal,
    fee_bps: u32,
    shares: ShareLedger,
}

impl LiquidityPool {
    /// Creates a seeded pool and mints the initial `1.0` share to `creator`.
    ///
    /// The registry has already moved the seed amounts into `custody` when
    /// this runs; reserves start out mirroring that transfer.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn bootstrap(
        id: PoolId,
        custody: AccountId,
        authorized_caller: AccountId,
        asset_a: AssetId,
        asset_b: AssetId,
        reserve_a: Decimal,
        reserve_b: Decimal,
        fee_bps: u32,
        creator: AccountId,
    ) -> Result<Self, ExchangeError> {
        let mut shares = ShareLedger::new(custody);
        shares.mint(custody, creator, Decimal::ONE)?;

        Ok(Self {
            id,
            custody,
            authorized_caller,
            asset_a,
            asset_b,
            reserve_a,
            reserve_b,
            fee_bps,
            shares,
        })
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn custody_account(&self) -> AccountId {
        self.custody
    }

    pub fn assets(&self) -> (AssetId, AssetId) {
        (self.asset_a, self.asset_b)
    }

    pub fn reserves(&self) -> (Decimal, Decimal) {
        (self.reserve_a, self.reserve_b)
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn total_shares(&self) -> Decimal {
        self.shares.total_shares()
    }

    pub fn share_balance_of(&self, holder: AccountId) -> Decimal {
        self.shares.balance_of(holder)
    }

    /// Maps a caller's (input, output) pair onto the pool's fixed order.
    pub fn orientation_of(&self, asset_in: AssetId, asset_out: AssetId) -> Option<Orientation> {
        if asset_in == self.asset_a && asset_out == self.asset_b {
            Some(Orientation::Forward)
        } else if asset_in == self.asset_b && asset_out == self.asset_a {
            Some(Orientation::Reversed)
        } else {
            None
        }
    }

    /// Output received for selling exactly `amount_in`. Pure.
    pub fn quote_exact_in(
        &self,
        orientation: Orientation,
        amount_in: Decimal,
    ) -> Result<Decimal, ExchangeError> {
        let (reserve_in, reserve_out) = self.oriented_reserves(orientation);
        CurveMath::quote_exact_in(amount_in, reserve_in, reserve_out, self.fee_bps)
    }

    /// Input required for buying exactly `amount_out`. Pure.
    pub fn quote_exact_out(
        &self,
        orientation: Orientation,
        amount_out: Decimal,
    ) -> Result<Decimal, ExchangeError> {
        let (reserve_in, reserve_out) = self.oriented_reserves(orientation);
        CurveMath::quote_exact_out(amount_out, reserve_in, reserve_out, self.fee_bps)
    }

    /// Reserve value of `share_amount`, in pool asset order. Pure.
    pub fn quote_liquidity(
        &self,
        share_amount: Decimal,
    ) -> Result<(Decimal, Decimal), ExchangeError> {
        ShareMath::redeem_value(
            self.reserve_a,
            self.reserve_b,
            share_amount,
            self.shares.total_shares(),
        )
    }

    /// Sells exactly `amount_in` on behalf of `recipient`.
    pub fn sell_exact_in(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        orientation: Orientation,
        recipient: AccountId,
        amount_in: Decimal,
        min_amount_out: Decimal,
    ) -> Result<SwapReceipt, ExchangeError> {
        self.require_authorized(caller)?;
        require_account(recipient)?;
        amount::require_non_negative(min_amount_out)?;

        let amount_out = self.quote_exact_in(orientation, amount_in)?;
        if amount_out < min_amount_out {
            return Err(ExchangeError::Slippage {
                computed: amount_out,
                bound: min_amount_out,
            });
        }

        self.execute_swap(ledger, orientation, recipient, amount_in, amount_out)
    }

    /// Buys exactly `amount_out` on behalf of `recipient`.
    pub fn buy_exact_out(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        orientation: Orientation,
        recipient: AccountId,
        amount_out: Decimal,
        max_amount_in: Decimal,
    ) -> Result<SwapReceipt, ExchangeError> {
        self.require_authorized(caller)?;
        require_account(recipient)?;
        amount::require_non_negative(max_amount_in)?;

        let quoted_in = self.quote_exact_out(orientation, amount_out)?;
        if quoted_in > max_amount_in {
            return Err(ExchangeError::Slippage {
                computed: quoted_in,
                bound: max_amount_in,
            });
        }

        self.execute_swap(ledger, orientation, recipient, quoted_in, amount_out)
    }

    /// Adds liquidity ratio-matched against current reserves. Desired
    /// amounts arrive in pool asset order.
    pub fn provide_liquidity(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        provider: AccountId,
        desired_a: Decimal,
        desired_b: Decimal,
    ) -> Result<ProvisionReceipt, ExchangeError> {
        self.require_authorized(caller)?;
        require_account(provider)?;

        let (used_a, used_b) =
            ShareMath::matched_deposit(desired_a, desired_b, self.reserve_a, self.reserve_b)?;
        let minted =
            ShareMath::shares_for_deposit(self.shares.total_shares(), used_a, self.reserve_a)?;
        if minted.is_zero() {
            // too small to mint a single sub-unit share
            return Err(ExchangeError::InvalidAmount(used_a));
        }

        ledger.transfer_from(self.asset_a, self.custody, provider, self.custody, used_a)?;
        if let Err(err) =
            ledger.transfer_from(self.asset_b, self.custody, provider, self.custody, used_b)
        {
            self.unwind_transfer(ledger, self.asset_a, provider, used_a);
            return Err(err);
        }

        self.shares.mint(self.custody, provider, minted)?;
        self.reserve_a += used_a;
        self.reserve_b += used_b;

        debug!(
            pool = %self.id,
            %used_a,
            %used_b,
            %minted,
            "liquidity provided"
        );

        Ok(ProvisionReceipt {
            asset_a: self.asset_a,
            amount_a: used_a,
            asset_b: self.asset_b,
            amount_b: used_b,
            shares_minted: minted,
        })
    }

    /// Redeems `share_amount` for the proportional slice of both reserves.
    /// Minimum bounds arrive in pool asset order.
    pub fn withdraw_liquidity(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        holder: AccountId,
        share_amount: Decimal,
        min_amount_a: Decimal,
        min_amount_b: Decimal,
    ) -> Result<WithdrawalReceipt, ExchangeError> {
        self.require_authorized(caller)?;
        require_account(holder)?;
        amount::require_positive(share_amount)?;
        amount::require_non_negative(min_amount_a)?;
        amount::require_non_negative(min_amount_b)?;

        let balance = self.shares.balance_of(holder);
        if balance < share_amount {
            return Err(ExchangeError::InsufficientFunds {
                account: holder,
                needed: share_amount,
                available: balance,
            });
        }

        let (amount_a, amount_b) = self.quote_liquidity(share_amount)?;
        if amount_a < min_amount_a {
            return Err(ExchangeError::Slippage {
                computed: amount_a,
                bound: min_amount_a,
            });
        }
        if amount_b < min_amount_b {
            return Err(ExchangeError::Slippage {
                computed: amount_b,
                bound: min_amount_b,
            });
        }

        ledger.transfer(self.asset_a, self.custody, holder, amount_a)?;
        if let Err(err) = ledger.transfer(self.asset_b, self.custody, holder, amount_b) {
            // pull the first payout back into custody before surfacing
            if let Err(unwind) = ledger.transfer(self.asset_a, holder, self.custody, amount_a) {
                warn!(pool = %self.id, error = %unwind, "failed to unwind withdrawal payout");
            }
            return Err(err);
        }

        self.shares.burn(self.custody, holder, share_amount)?;
        self.reserve_a -= amount_a;
        self.reserve_b -= amount_b;
        let drained = self.shares.total_shares().is_zero();

        debug!(
            pool = %self.id,
            %amount_a,
            %amount_b,
            %share_amount,
            drained,
            "liquidity withdrawn"
        );

        Ok(WithdrawalReceipt {
            asset_a: self.asset_a,
            amount_a,
            asset_b: self.asset_b,
            amount_b,
            shares_burned: share_amount,
            drained,
        })
    }

    fn oriented_assets(&self, orientation: Orientation) -> (AssetId, AssetId) {
        match orientation {
            Orientation::Forward => (self.asset_a, self.asset_b),
            Orientation::Reversed => (self.asset_b, self.asset_a),
        }
    }

    fn oriented_reserves(&self, orientation: Orientation) -> (Decimal, Decimal) {
        match orientation {
            Orientation::Forward => (self.reserve_a, self.reserve_b),
            Orientation::Reversed => (self.reserve_b, self.reserve_a),
        }
    }

    fn execute_swap(
        &mut self,
        ledger: &mut dyn AssetLedger,
        orientation: Orientation,
        recipient: AccountId,
        amount_in: Decimal,
        amount_out: Decimal,
    ) -> Result<SwapReceipt, ExchangeError> {
        let (asset_in, asset_out) = self.oriented_assets(orientation);

        ledger.transfer_from(asset_in, self.custody, recipient, self.custody, amount_in)?;
        if let Err(err) = ledger.transfer(asset_out, self.custody, recipient, amount_out) {
            self.unwind_transfer(ledger, asset_in, recipient, amount_in);
            return Err(err);
        }

        match orientation {
            Orientation::Forward => {
                self.reserve_a += amount_in;
                self.reserve_b -= amount_out;
            }
            Orientation::Reversed => {
                self.reserve_b += amount_in;
                self.reserve_a -= amount_out;
            }
        }

        debug!(
            pool = %self.id,
            %asset_in,
            %amount_in,
            %asset_out,
            %amount_out,
            "swap executed"
        );

        Ok(SwapReceipt {
            asset_in,
            amount_in,
            asset_out,
            amount_out,
        })
    }

    /// Returns an amount previously pulled into custody back to `account`.
    fn unwind_transfer(
        &self,
        ledger: &mut dyn AssetLedger,
        asset: AssetId,
        account: AccountId,
        amount: Decimal,
    ) {
        if let Err(unwind) = ledger.transfer(asset, self.custody, account, amount) {
            warn!(pool = %self.id, error = %unwind, "failed to unwind aborted transfer");
        }
    }

    fn require_authorized(&self, caller: AccountId) -> Result<(), ExchangeError> {
        if caller != self.authorized_caller {
            return Err(ExchangeError::Unauthorized(caller));
        }
        Ok(())
    }
}

fn require_account(account: AccountId) -> Result<(), ExchangeError> {
    if account.is_zero() {
        return Err(ExchangeError::InvalidAsset);
    }
    Ok(())
}
