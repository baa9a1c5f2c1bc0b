//! The chain's native asset, wrapped as a fungible token.
//!
//! Native units are not a ledger of their own: holders keep them outside
//! any token. [`WrappedNativeToken`] tracks those native balances next to
//! the wrapped token, so a deposit (native in, wrapped out) and a
//! withdrawal (wrapped in, native out) are single ledger mutations and
//! roll back with the rest of a call.
//!
//! ```text
//! Σ native balances + escrow == native issued
//! wrapped total supply       == escrow
//! ```

use std::collections::HashMap;

use pairswap_types::{Address, AssetId, PairswapError, Result};

use crate::{StandardToken, TokenLedger};

#[derive(Debug, Clone)]
pub struct WrappedNativeToken {
    wrapped: StandardToken,
    native: HashMap<Address, u128>,
    escrow: u128,
    native_issued: u128,
}

impl WrappedNativeToken {
    #[must_use]
    pub fn new(asset: AssetId) -> Self {
        Self {
            wrapped: StandardToken::new(asset),
            native: HashMap::new(),
            escrow: 0,
            native_issued: 0,
        }
    }

    #[must_use]
    pub fn labeled(label: &str) -> Self {
        Self::new(AssetId::from_label(label))
    }

    #[must_use]
    pub fn native_balance_of(&self, holder: &Address) -> u128 {
        self.native.get(holder).copied().unwrap_or_default()
    }

    /// Native units locked behind the wrapped supply.
    #[must_use]
    pub fn escrow(&self) -> u128 {
        self.escrow
    }

    /// Give `holder` native units from outside the system.
    pub fn fund_native(&mut self, holder: &Address, amount: u128) -> Result<()> {
        self.native_issued = self
            .native_issued
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow("native issued"))?;
        self.credit_native(holder, amount)
    }

    /// Lock `amount` of `from`'s native units and mint as much wrapped to
    /// `to`.
    ///
    /// # Errors
    /// `InsufficientBalance` if `from` holds fewer native units.
    pub fn deposit(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        let available = self.native_balance_of(from);
        if available < amount {
            return Err(PairswapError::InsufficientBalance {
                asset: self.asset(),
                needed: amount,
                available,
            });
        }
        self.wrapped.mint(to, amount)?;
        self.native.insert(*from, available - amount);
        self.escrow += amount;
        tracing::trace!(
            asset = %self.asset(),
            from = %from.short(),
            to = %to.short(),
            amount,
            "native wrapped"
        );
        Ok(())
    }

    /// Burn `amount` of `from`'s wrapped balance and release as many native
    /// units to `to`.
    ///
    /// # Errors
    /// - `TransferFailed` if `to` is the zero address
    /// - `InsufficientBalance` if `from` holds less wrapped
    pub fn withdraw(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        if to.is_zero() {
            return Err(PairswapError::TransferFailed {
                asset: self.asset(),
                reason: "native release to the zero address".into(),
            });
        }
        self.wrapped.burn(from, amount)?;
        self.escrow -= amount;
        self.credit_native(to, amount)?;
        tracing::trace!(
            asset = %self.asset(),
            from = %from.short(),
            to = %to.short(),
            amount,
            "native unwrapped"
        );
        Ok(())
    }

    fn credit_native(&mut self, holder: &Address, amount: u128) -> Result<()> {
        let balance = self.native.entry(*holder).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow("native balance"))?;
        Ok(())
    }

    /// Verify the wrapped supply is fully backed and no native unit was
    /// created or lost.
    pub fn verify_backing(&self) -> Result<()> {
        self.wrapped.verify_supply()?;
        if self.wrapped.total_supply() != self.escrow {
            return Err(PairswapError::SupplyInvariantViolation {
                reason: format!(
                    "{}: wrapped supply {} != escrow {}",
                    self.asset(),
                    self.wrapped.total_supply(),
                    self.escrow
                ),
            });
        }
        let mut native_total = self.escrow;
        for balance in self.native.values() {
            native_total = native_total
                .checked_add(*balance)
                .ok_or_else(|| PairswapError::overflow("sum of native balances"))?;
        }
        if native_total != self.native_issued {
            return Err(PairswapError::SupplyInvariantViolation {
                reason: format!(
                    "{}: native held {native_total} != issued {}",
                    self.asset(),
                    self.native_issued
                ),
            });
        }
        Ok(())
    }
}

// Wrapped units only come from deposits, so `mint` keeps the refusing
// default.
impl TokenLedger for WrappedNativeToken {
    fn asset(&self) -> AssetId {
        self.wrapped.asset()
    }

    fn balance_of(&self, holder: &Address) -> u128 {
        self.wrapped.balance_of(holder)
    }

    fn total_supply(&self) -> u128 {
        self.wrapped.total_supply()
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.wrapped.transfer(from, to, amount)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<()> {
        self.wrapped.approve(owner, spender, amount)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.wrapped.allowance(owner, spender)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.wrapped.transfer_from(spender, from, to, amount)
    }

    fn as_wrapped_native(&self) -> Option<&WrappedNativeToken> {
        Some(self)
    }

    fn as_wrapped_native_mut(&mut self) -> Option<&mut WrappedNativeToken> {
        Some(self)
    }

    fn clone_box(&self) -> Box<dyn TokenLedger> {
        Box::new(self.clone())
    }
}
