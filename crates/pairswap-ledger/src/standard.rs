//! A plain fungible asset ledger.
//!
//! Balances and allowances keyed by [`Address`]. Holds the conservation
//! bookkeeping for its own supply, so tests can assert that nothing the
//! pool did created or destroyed units.

use std::collections::HashMap;

use pairswap_types::{Address, AssetId, PairswapError, Result};

use crate::{SupplyConservation, TokenLedger};

/// Standard fungible token: exact transfers, unlimited allowance at
/// `u128::MAX`.
#[derive(Debug, Clone)]
pub struct StandardToken {
    asset: AssetId,
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
    supply: SupplyConservation,
}

impl StandardToken {
    #[must_use]
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            supply: SupplyConservation::new(),
        }
    }

    /// Token whose asset id is derived from `label`.
    #[must_use]
    pub fn labeled(label: &str) -> Self {
        Self::new(AssetId::from_label(label))
    }

    fn credit(&mut self, holder: &Address, amount: u128) -> Result<()> {
        let balance = self.balances.entry(*holder).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow(format!("{} balance", self.asset)))?;
        Ok(())
    }

    fn debit(&mut self, holder: &Address, amount: u128) -> Result<()> {
        let available = self.balance_of(holder);
        if available < amount {
            return Err(PairswapError::InsufficientBalance {
                asset: self.asset,
                needed: amount,
                available,
            });
        }
        self.balances.insert(*holder, available - amount);
        Ok(())
    }

    /// Destroy `amount` of `from`'s balance.
    pub fn burn(&mut self, from: &Address, amount: u128) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        self.supply.record_burn(amount)
    }

    /// Reject a transfer up front, before any balance or allowance moves.
    pub(crate) fn check_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        if to.is_zero() {
            return Err(PairswapError::TransferFailed {
                asset: self.asset,
                reason: "transfer to the zero address".into(),
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(PairswapError::InsufficientBalance {
                asset: self.asset,
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    pub(crate) fn spend_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<()> {
        let available = self.allowance(owner, spender);
        if available == u128::MAX {
            return Ok(());
        }
        if available < amount {
            return Err(PairswapError::InsufficientAllowance {
                asset: self.asset,
                needed: amount,
                available,
            });
        }
        self.allowances.insert((*owner, *spender), available - amount);
        Ok(())
    }

    /// Verify `Σ balances == total_supply == minted - burned`.
    pub fn verify_supply(&self) -> Result<()> {
        let mut sum: u128 = 0;
        for balance in self.balances.values() {
            sum = sum
                .checked_add(*balance)
                .ok_or_else(|| PairswapError::overflow("sum of balances"))?;
        }
        if sum != self.total_supply {
            return Err(PairswapError::SupplyInvariantViolation {
                reason: format!(
                    "{}: sum of balances {sum} != total supply {}",
                    self.asset, self.total_supply
                ),
            });
        }
        self.supply.verify(self.asset, self.total_supply)
    }

    /// Number of holders with a balance entry.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }
}

impl TokenLedger for StandardToken {
    fn asset(&self) -> AssetId {
        self.asset
    }

    fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.check_transfer(from, to, amount)?;
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        tracing::trace!(
            asset = %self.asset,
            from = %from.short(),
            to = %to.short(),
            amount,
            "transfer"
        );
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<()> {
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.check_transfer(from, to, amount)?;
        self.spend_allowance(from, spender, amount)?;
        self.transfer(from, to, amount)
    }

    fn mint(&mut self, to: &Address, amount: u128) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow(format!("{} total supply", self.asset)))?;
        self.credit(to, amount)?;
        self.supply.record_mint(amount)
    }

    fn clone_box(&self) -> Box<dyn TokenLedger> {
        Box::new(self.clone())
    }
}
