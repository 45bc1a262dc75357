//! Pool registry: pair resolution, orientation, delegation, events
//!
//! The registry is the single front door. It owns every pool, keys them
//! symmetrically by unordered asset pair (both orderings point at the same
//! pool id), and translates each caller's asset pair onto the pool's fixed
//! internal order before delegating. Pools accept mutations only from the
//! registry's account, so all reserve movement funnels through here.

use crate::config::ExchangeConfig;
use crate::ledger::AssetLedger;
use crate::pool::{
    LiquidityPool, Orientation, ProvisionReceipt, SwapReceipt, WithdrawalReceipt,
};
use pairswap_types::{amount, AccountId, AssetId, ExchangeError, ExchangeEvent, PoolId};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

/// Prefix of deterministically derived pool custody accounts.
const CUSTODY_TAG: &[u8; 12] = b"pool-custody";

#[derive(Debug)]
pub struct PoolRegistry {
    /// The registry's own account: stored in every pool as the authorized
    /// caller and used as the spender when seeding new pools.
    account: AccountId,
    config: ExchangeConfig,
    pools: HashMap<PoolId, LiquidityPool>,
    by_pair: HashMap<(AssetId, AssetId), PoolId>,
    next_pool_id: u64,
    events: Vec<ExchangeEvent>,
}

impl PoolRegistry {
    pub fn new(account: AccountId, config: ExchangeConfig) -> Self {
        Self {
            account,
            config,
            pools: HashMap::new(),
            by_pair: HashMap::new(),
            next_pool_id: 1,
            events: Vec::new(),
        }
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Creates and seeds a pool for a previously unregistered pair.
    ///
    /// Pulls `amount_a`/`amount_b` from `creator` (the registry must hold
    /// an allowance) into the new pool's custody account, mints the initial
    /// `1.0` share to the creator, and registers the pair both ways.
    pub fn create_pool(
        &mut self,
        creator: AccountId,
        ledger: &mut dyn AssetLedger,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a: Decimal,
        amount_b: Decimal,
    ) -> Result<PoolId, ExchangeError> {
        if asset_a.is_zero() || asset_b.is_zero() || creator.is_zero() {
            return Err(ExchangeError::InvalidAsset);
        }
        if asset_a == asset_b {
            return Err(ExchangeError::SameAsset(asset_a));
        }
        amount::require_positive(amount_a)?;
        amount::require_positive(amount_b)?;
        if self.by_pair.contains_key(&(asset_a, asset_b)) {
            return Err(ExchangeError::PoolExists(asset_a, asset_b));
        }

        let id = PoolId::new(self.next_pool_id);
        let custody = custody_account(id);

        ledger.transfer_from(asset_a, self.account, creator, custody, amount_a)?;
        if let Err(err) = ledger.transfer_from(asset_b, self.account, creator, custody, amount_b) {
            if let Err(unwind) = ledger.transfer(asset_a, custody, creator, amount_a) {
                warn!(pool = %id, error = %unwind, "failed to unwind pool seeding");
            }
            return Err(err);
        }

        let pool = LiquidityPool::bootstrap(
            id,
            custody,
            self.account,
            asset_a,
            asset_b,
            amount_a,
            amount_b,
            self.config.fee_bps,
            creator,
        )?;

        self.next_pool_id += 1;
        self.by_pair.insert((asset_a, asset_b), id);
        self.by_pair.insert((asset_b, asset_a), id);
        self.pools.insert(id, pool);

        info!(
            pool = %id,
            %asset_a,
            %asset_b,
            %amount_a,
            %amount_b,
            "pool created"
        );
        self.events.push(ExchangeEvent::PoolCreated {
            creator,
            asset_a,
            asset_b,
            pool: id,
        });

        Ok(id)
    }

    pub fn pair_exists(&self, asset_a: AssetId, asset_b: AssetId) -> bool {
        self.by_pair.contains_key(&(asset_a, asset_b))
    }

    pub fn pool_id(&self, asset_a: AssetId, asset_b: AssetId) -> Option<PoolId> {
        self.by_pair.get(&(asset_a, asset_b)).copied()
    }

    pub fn pool(&self, id: PoolId) -> Option<&LiquidityPool> {
        self.pools.get(&id)
    }

    /// Output received for selling `amount_in` of `asset_in`. Pure.
    pub fn quote_amount_out(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Decimal,
    ) -> Result<Decimal, ExchangeError> {
        let (pool, orientation) = self.resolve(asset_in, asset_out)?;
        pool.quote_exact_in(orientation, amount_in)
    }

    /// Input required for buying `amount_out` of `asset_out`. Pure.
    pub fn quote_amount_in(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_out: Decimal,
    ) -> Result<Decimal, ExchangeError> {
        let (pool, orientation) = self.resolve(asset_in, asset_out)?;
        pool.quote_exact_out(orientation, amount_out)
    }

    /// Reserve value of `share_amount`, returned in the caller's asset
    /// order. Pure.
    pub fn quote_liquidity(
        &self,
        asset_a: AssetId,
        asset_b: AssetId,
        share_amount: Decimal,
    ) -> Result<(Decimal, Decimal), ExchangeError> {
        let (pool, orientation) = self.resolve(asset_a, asset_b)?;
        let (value_a, value_b) = pool.quote_liquidity(share_amount)?;
        Ok(match orientation {
            Orientation::Forward => (value_a, value_b),
            Orientation::Reversed => (value_b, value_a),
        })
    }

    /// Sells exactly `amount_in` of `asset_in` for `asset_out` on behalf of
    /// `caller`.
    pub fn swap_exact_in(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Decimal,
        min_amount_out: Decimal,
    ) -> Result<SwapReceipt, ExchangeError> {
        let account = self.account;
        let (_, pool, orientation) = self.resolve_mut(asset_in, asset_out)?;
        let receipt =
            pool.sell_exact_in(account, ledger, orientation, caller, amount_in, min_amount_out)?;
        self.push_swap_event(caller, &receipt);
        Ok(receipt)
    }

    /// Buys exactly `amount_out` of `asset_out` with `asset_in` on behalf
    /// of `caller`.
    pub fn swap_exact_out(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_out: Decimal,
        max_amount_in: Decimal,
    ) -> Result<SwapReceipt, ExchangeError> {
        let account = self.account;
        let (_, pool, orientation) = self.resolve_mut(asset_in, asset_out)?;
        let receipt =
            pool.buy_exact_out(account, ledger, orientation, caller, amount_out, max_amount_in)?;
        self.push_swap_event(caller, &receipt);
        Ok(receipt)
    }

    /// Adds liquidity for `caller`; desired amounts arrive in the caller's
    /// asset order and are ratio-matched by the pool.
    pub fn provide_liquidity(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a_desired: Decimal,
        amount_b_desired: Decimal,
    ) -> Result<ProvisionReceipt, ExchangeError> {
        let account = self.account;
        let (_, pool, orientation) = self.resolve_mut(asset_a, asset_b)?;
        let (desired_first, desired_second) = match orientation {
            Orientation::Forward => (amount_a_desired, amount_b_desired),
            Orientation::Reversed => (amount_b_desired, amount_a_desired),
        };
        let receipt =
            pool.provide_liquidity(account, ledger, caller, desired_first, desired_second)?;

        self.events.push(ExchangeEvent::LiquidityProvided {
            account: caller,
            asset_a: receipt.asset_a,
            amount_a: receipt.amount_a,
            asset_b: receipt.asset_b,
            amount_b: receipt.amount_b,
        });
        Ok(receipt)
    }

    /// Withdraws `share_amount` for `caller`; minimum bounds arrive in the
    /// caller's asset order. Deregisters the pair when the pool drains.
    pub fn withdraw_liquidity(
        &mut self,
        caller: AccountId,
        ledger: &mut dyn AssetLedger,
        asset_a: AssetId,
        asset_b: AssetId,
        share_amount: Decimal,
        min_amount_a: Decimal,
        min_amount_b: Decimal,
    ) -> Result<WithdrawalReceipt, ExchangeError> {
        let account = self.account;
        let (id, pool, orientation) = self.resolve_mut(asset_a, asset_b)?;
        let (min_first, min_second) = match orientation {
            Orientation::Forward => (min_amount_a, min_amount_b),
            Orientation::Reversed => (min_amount_b, min_amount_a),
        };
        let receipt =
            pool.withdraw_liquidity(account, ledger, caller, share_amount, min_first, min_second)?;

        self.events.push(ExchangeEvent::LiquidityWithdrawn {
            account: caller,
            asset_a: receipt.asset_a,
            asset_b: receipt.asset_b,
            shares: receipt.shares_burned,
        });

        if receipt.drained {
            self.deregister(id);
        }
        Ok(receipt)
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.events
    }

    /// Removes and returns all pending events.
    pub fn drain_events(&mut self) -> Vec<ExchangeEvent> {
        std::mem::take(&mut self.events)
    }

    fn resolve(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<(&LiquidityPool, Orientation), ExchangeError> {
        let id = self
            .by_pair
            .get(&(asset_in, asset_out))
            .copied()
            .ok_or(ExchangeError::PoolNotFound(asset_in, asset_out))?;
        let pool = self
            .pools
            .get(&id)
            .ok_or(ExchangeError::PoolNotFound(asset_in, asset_out))?;
        let orientation = pool
            .orientation_of(asset_in, asset_out)
            .ok_or(ExchangeError::PoolNotFound(asset_in, asset_out))?;
        Ok((pool, orientation))
    }

    fn resolve_mut(
        &mut self,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<(PoolId, &mut LiquidityPool, Orientation), ExchangeError> {
        let id = self
            .by_pair
            .get(&(asset_in, asset_out))
            .copied()
            .ok_or(ExchangeError::PoolNotFound(asset_in, asset_out))?;
        let pool = self
            .pools
            .get_mut(&id)
            .ok_or(ExchangeError::PoolNotFound(asset_in, asset_out))?;
        let orientation = pool
            .orientation_of(asset_in, asset_out)
            .ok_or(ExchangeError::PoolNotFound(asset_in, asset_out))?;
        Ok((id, pool, orientation))
    }

    fn push_swap_event(&mut self, caller: AccountId, receipt: &SwapReceipt) {
        self.events.push(ExchangeEvent::Swapped {
            account: caller,
            asset_in: receipt.asset_in,
            amount_in: receipt.amount_in,
            asset_out: receipt.asset_out,
            amount_out: receipt.amount_out,
        });
    }

    fn deregister(&mut self, id: PoolId) {
        if let Some(pool) = self.pools.remove(&id) {
            let (asset_a, asset_b) = pool.assets();
            self.by_pair.remove(&(asset_a, asset_b));
            self.by_pair.remove(&(asset_b, asset_a));
            info!(pool = %id, %asset_a, %asset_b, "pool drained and deregistered");
        }
    }
}

/// Derives a pool's ledger account from its id: a fixed tag plus the id in
/// big-endian. Ids are never reused, so neither are custody accounts.
fn custody_account(id: PoolId) -> AccountId {
    let mut bytes = [0u8; 20];
    bytes[..12].copy_from_slice(CUSTODY_TAG);
    bytes[12..].copy_from_slice(&id.get().to_be_bytes());
    AccountId::new(bytes)
}
