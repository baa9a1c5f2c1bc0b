//! Liquidity share ledger.
//!
//! Shares are fungible claims on a pool's reserves. The ledger enforces
//! `Σ balances == total_supply` on every mutation and refuses any spend by
//! [`Address::ZERO`], which holds the permanently locked minimum liquidity.

use std::collections::HashMap;

use pairswap_types::{Address, PairswapError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

impl ShareLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Number of holders with a non-zero balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<()> {
        let total = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow("total shares"))?;
        // Each balance is bounded by the total, so this cannot overflow.
        *self.balances.entry(*to).or_default() += amount;
        self.total_supply = total;
        Ok(())
    }

    pub fn burn(&mut self, from: &Address, amount: u128) -> Result<()> {
        self.check_spend(from, amount)?;
        self.debit(from, amount);
        self.total_supply -= amount;
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.check_spend(from, amount)?;
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient(
                "shares cannot be sent to the zero address",
            ));
        }
        self.debit(from, amount);
        *self.balances.entry(*to).or_default() += amount;
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<()> {
        if owner.is_zero() {
            return Err(PairswapError::SharesLocked);
        }
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    /// Spend `from`'s shares on behalf of `spender`. An allowance of
    /// `u128::MAX` is never decremented.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(PairswapError::InsufficientShares {
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(from, to, amount)?;
        if allowed != u128::MAX {
            self.allowances.insert((*from, *spender), allowed - amount);
        }
        Ok(())
    }

    /// Verify `Σ balances == total_supply`.
    pub fn verify_conservation(&self) -> Result<()> {
        let mut sum: u128 = 0;
        for balance in self.balances.values() {
            sum = sum
                .checked_add(*balance)
                .ok_or_else(|| PairswapError::overflow("sum of share balances"))?;
        }
        if sum != self.total_supply {
            return Err(PairswapError::SupplyInvariantViolation {
                reason: format!(
                    "sum of share balances {sum} != total shares {}",
                    self.total_supply
                ),
            });
        }
        Ok(())
    }

    fn check_spend(&self, from: &Address, amount: u128) -> Result<()> {
        if from.is_zero() {
            return Err(PairswapError::SharesLocked);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(PairswapError::InsufficientShares {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    fn debit(&mut self, from: &Address, amount: u128) {
        if let Some(balance) = self.balances.get_mut(from) {
            *balance -= amount;
        }
    }
}
