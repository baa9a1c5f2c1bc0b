//! The asset ledger capability.

use std::fmt;

use pairswap_types::{Address, AssetId, PairswapError, Result};

use crate::WrappedNativeToken;

/// What a pool needs from an exchangeable asset's ledger.
///
/// The caller is the authority: `transfer` moves `from`'s funds without
/// further authorization, so only the engine (acting for its custody
/// address) and test harnesses should hold `&mut` access. Third parties
/// spend other holders' funds through `transfer_from` and an allowance.
pub trait TokenLedger: fmt::Debug + Send {
    /// The asset this ledger tracks.
    fn asset(&self) -> AssetId;

    fn balance_of(&self, holder: &Address) -> u128;

    fn total_supply(&self) -> u128;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()>;

    /// Set `spender`'s allowance over `owner`'s balance.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<()>;

    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    /// Spend `from`'s balance on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()>;

    /// Issue new units. Ledgers without an issuer refuse.
    fn mint(&mut self, to: &Address, amount: u128) -> Result<()> {
        let _ = (to, amount);
        Err(PairswapError::TransferFailed {
            asset: self.asset(),
            reason: "ledger does not support minting".into(),
        })
    }

    /// The wrapper view, for the one ledger kind that also holds native
    /// balances.
    fn as_wrapped_native(&self) -> Option<&WrappedNativeToken> {
        None
    }

    fn as_wrapped_native_mut(&mut self) -> Option<&mut WrappedNativeToken> {
        None
    }

    /// Clone into a box, so a ledger set can be snapshotted.
    fn clone_box(&self) -> Box<dyn TokenLedger>;
}

impl Clone for Box<dyn TokenLedger> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
