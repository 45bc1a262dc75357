//! Per-pool ownership-share ledger
//!
//! Shares are fungible units of proportional pool ownership. Only the
//! owning pool's custody account may mint or burn; everyone can read.

use pairswap_types::{amount, AccountId, ExchangeError};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ShareLedger {
    owner: AccountId,
    total_shares: Decimal,
    balances: HashMap<AccountId, Decimal>,
}

impl ShareLedger {
    pub(crate) fn new(owner: AccountId) -> Self {
        Self {
            owner,
            total_shares: Decimal::ZERO,
            balances: HashMap::new(),
        }
    }

    pub fn total_shares(&self) -> Decimal {
        self.total_shares
    }

    pub fn balance_of(&self, holder: AccountId) -> Decimal {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    /// Mints `amount` shares to `to`. Only the owning pool may call.
    pub fn mint(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.require_owner(caller)?;
        if to.is_zero() {
            return Err(ExchangeError::InvalidAsset);
        }
        amount::require_positive(amount)?;

        self.total_shares += amount;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    /// Burns `amount` shares from `from`. Only the owning pool may call.
    pub fn burn(
        &mut self,
        caller: AccountId,
        from: AccountId,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.require_owner(caller)?;
        if from.is_zero() {
            return Err(ExchangeError::InvalidAsset);
        }
        amount::require_positive(amount)?;

        let balance = self.balance_of(from);
        if balance < amount {
            return Err(ExchangeError::InsufficientFunds {
                account: from,
                needed: amount,
                available: balance,
            });
        }

        self.total_shares -= amount;
        let remaining = balance - amount;
        if remaining.is_zero() {
            self.balances.remove(&from);
        } else {
            self.balances.insert(from, remaining);
        }
        Ok(())
    }

    fn require_owner(&self, caller: AccountId) -> Result<(), ExchangeError> {
        if caller != self.owner {
            return Err(ExchangeError::Unauthorized(caller));
        }
        Ok(())
    }
}
