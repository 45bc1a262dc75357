//! Asset-ledger capability
//!
//! The engine never owns token balances; it consumes an external fungible
//! ledger through [`AssetLedger`]. Any failed call must leave the ledger
//! unchanged; the engine relies on that to keep its own operations atomic.
//!
//! [`InMemoryAssetLedger`] is the reference implementation used by the test
//! suites and demos. It reproduces the allowance discipline of the ledgers
//! the engine fronts in production: `transfer_from` spends an allowance the
//! owner granted to the spender beforehand.

use pairswap_types::{amount, AccountId, AssetId, ExchangeError};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// External fungible-asset ledger consumed by pools and the registry.
pub trait AssetLedger {
    /// Sub-unit precision of `asset`.
    fn decimals(&self, asset: AssetId) -> Result<u32, ExchangeError>;

    /// Current balance of `owner` in `asset`.
    fn balance_of(&self, asset: AssetId, owner: AccountId) -> Result<Decimal, ExchangeError>;

    /// Grants `spender` the right to move up to `amount` of `owner`'s
    /// balance via [`AssetLedger::transfer_from`]. Overwrites any prior
    /// grant.
    fn approve(
        &mut self,
        asset: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError>;

    /// Moves `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError>;

    /// Moves `amount` from `from` to `to` on the authority of `spender`,
    /// consuming `spender`'s allowance from `from`.
    fn transfer_from(
        &mut self,
        asset: AssetId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError>;
}

/// Reference in-memory [`AssetLedger`].
#[derive(Debug, Default)]
pub struct InMemoryAssetLedger {
    decimals: HashMap<AssetId, u32>,
    balances: HashMap<(AssetId, AccountId), Decimal>,
    /// (asset, owner, spender) → remaining grant
    allowances: HashMap<(AssetId, AccountId, AccountId), Decimal>,
}

impl InMemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset. Re-registering updates its precision.
    pub fn register_asset(&mut self, asset: AssetId, decimals: u32) -> Result<(), ExchangeError> {
        if asset.is_zero() {
            return Err(ExchangeError::InvalidAsset);
        }
        self.decimals.insert(asset, decimals);
        Ok(())
    }

    /// Credits `amount` of `asset` to `account` out of thin air. Seeding
    /// hook for tests and demos; real ledgers issue supply elsewhere.
    pub fn credit(
        &mut self,
        asset: AssetId,
        account: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.require_known(asset)?;
        require_account(account)?;
        amount::require_positive(amount)?;
        *self.balances.entry((asset, account)).or_default() += amount;
        Ok(())
    }

    /// Remaining allowance `spender` holds over `owner`'s balance.
    pub fn allowance(&self, asset: AssetId, owner: AccountId, spender: AccountId) -> Decimal {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn require_known(&self, asset: AssetId) -> Result<(), ExchangeError> {
        if self.decimals.contains_key(&asset) {
            Ok(())
        } else {
            Err(ExchangeError::InvalidAsset)
        }
    }

    fn debit(
        &mut self,
        asset: AssetId,
        from: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        let balance = self.balances.entry((asset, from)).or_default();
        if *balance < amount {
            return Err(ExchangeError::InsufficientFunds {
                account: from,
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }
}

impl AssetLedger for InMemoryAssetLedger {
    fn decimals(&self, asset: AssetId) -> Result<u32, ExchangeError> {
        self.decimals
            .get(&asset)
            .copied()
            .ok_or(ExchangeError::InvalidAsset)
    }

    fn balance_of(&self, asset: AssetId, owner: AccountId) -> Result<Decimal, ExchangeError> {
        self.require_known(asset)?;
        Ok(self
            .balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default())
    }

    fn approve(
        &mut self,
        asset: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.require_known(asset)?;
        require_account(owner)?;
        require_account(spender)?;
        amount::require_non_negative(amount)?;
        self.allowances.insert((asset, owner, spender), amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.require_known(asset)?;
        require_account(from)?;
        require_account(to)?;
        amount::require_non_negative(amount)?;
        if amount.is_zero() {
            return Ok(());
        }
        self.debit(asset, from, amount)?;
        *self.balances.entry((asset, to)).or_default() += amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        asset: AssetId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.require_known(asset)?;
        require_account(spender)?;
        require_account(from)?;
        require_account(to)?;
        amount::require_non_negative(amount)?;
        if amount.is_zero() {
            return Ok(());
        }

        let key = (asset, from, spender);
        let allowance = self.allowances.get(&key).copied().unwrap_or_default();
        if allowance < amount {
            return Err(ExchangeError::InsufficientFunds {
                account: spender,
                needed: amount,
                available: allowance,
            });
        }

        self.debit(asset, from, amount)?;
        self.allowances.insert(key, allowance - amount);
        *self.balances.entry((asset, to)).or_default() += amount;
        Ok(())
    }
}

fn require_account(account: AccountId) -> Result<(), ExchangeError> {
    if account.is_zero() {
        return Err(ExchangeError::InvalidAsset);
    }
    Ok(())
}
