//! An asset that burns a fee on every transfer.
//!
//! The recipient receives less than the sender sent. Pools must therefore
//! measure received amounts from balances rather than trust the requested
//! transfer amount.

use pairswap_math::mul_div;
use pairswap_types::constants::BPS_SCALE;
use pairswap_types::{Address, AssetId, PairswapError, Result};

use crate::{StandardToken, TokenLedger};

#[derive(Debug, Clone)]
pub struct FeeOnTransferToken {
    inner: StandardToken,
    fee_bps: u128,
}

impl FeeOnTransferToken {
    /// # Errors
    /// `Configuration` if `fee_bps` is 100% or more.
    pub fn new(asset: AssetId, fee_bps: u128) -> Result<Self> {
        if fee_bps >= BPS_SCALE {
            return Err(PairswapError::Configuration(format!(
                "transfer fee {fee_bps} bps must be below {BPS_SCALE}"
            )));
        }
        Ok(Self {
            inner: StandardToken::new(asset),
            fee_bps,
        })
    }

    pub fn labeled(label: &str, fee_bps: u128) -> Result<Self> {
        Self::new(AssetId::from_label(label), fee_bps)
    }

    /// Fee burned when `amount` is transferred.
    pub fn fee_on(&self, amount: u128) -> Result<u128> {
        mul_div(amount, self.fee_bps, BPS_SCALE)
    }

    #[must_use]
    pub fn fee_bps(&self) -> u128 {
        self.fee_bps
    }

    pub fn verify_supply(&self) -> Result<()> {
        self.inner.verify_supply()
    }
}

impl TokenLedger for FeeOnTransferToken {
    fn asset(&self) -> AssetId {
        self.inner.asset()
    }

    fn balance_of(&self, holder: &Address) -> u128 {
        self.inner.balance_of(holder)
    }

    fn total_supply(&self) -> u128 {
        self.inner.total_supply()
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.inner.check_transfer(from, to, amount)?;
        let fee = self.fee_on(amount)?;
        self.inner.transfer(from, to, amount - fee)?;
        self.inner.burn(from, fee)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<()> {
        self.inner.approve(owner, spender, amount)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.inner.allowance(owner, spender)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.inner.check_transfer(from, to, amount)?;
        self.inner.spend_allowance(from, spender, amount)?;
        self.transfer(from, to, amount)
    }

    fn mint(&mut self, to: &Address, amount: u128) -> Result<()> {
        self.inner.mint(to, amount)
    }

    fn clone_box(&self) -> Box<dyn TokenLedger> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_receives_less() {
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");
        let mut token = FeeOnTransferToken::labeled("TAX", 100).unwrap();
        token.mint(&alice, 10_000).unwrap();
        token.transfer(&alice, &bob, 1_000).unwrap();
        assert_eq!(token.balance_of(&alice), 9_000);
        assert_eq!(token.balance_of(&bob), 990);
        assert_eq!(token.total_supply(), 9_990);
        token.verify_supply().unwrap();
    }

    #[test]
    fn fee_rounds_down() {
        let token = FeeOnTransferToken::labeled("TAX", 100).unwrap();
        assert_eq!(token.fee_on(99).unwrap(), 0);
        assert_eq!(token.fee_on(100).unwrap(), 1);
    }

    #[test]
    fn insufficient_balance_leaves_state() {
        let alice = Address::from_label("alice");
        let mut token = FeeOnTransferToken::labeled("TAX", 500).unwrap();
        token.mint(&alice, 10).unwrap();
        assert!(token.transfer(&alice, &Address::from_label("bob"), 11).is_err());
        assert_eq!(token.balance_of(&alice), 10);
    }

    #[test]
    fn fee_at_or_above_scale_rejected() {
        assert!(FeeOnTransferToken::labeled("TAX", BPS_SCALE).is_err());
    }
}
