//! Supply conservation for a single token.
//!
//! ```text
//! Σ balances == total_supply == Σ minted - Σ burned
//! ```
//!
//! Transfers move value between holders and must never change either side.

use pairswap_types::{AssetId, PairswapError, Result};

/// Minted/burned totals for one asset since genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyConservation {
    minted: u128,
    burned: u128,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mint(&mut self, amount: u128) -> Result<()> {
        self.minted = self
            .minted
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow("minted supply"))?;
        Ok(())
    }

    pub fn record_burn(&mut self, amount: u128) -> Result<()> {
        self.burned = self
            .burned
            .checked_add(amount)
            .ok_or_else(|| PairswapError::overflow("burned supply"))?;
        Ok(())
    }

    /// `minted - burned`.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.minted.saturating_sub(self.burned)
    }

    #[must_use]
    pub fn total_minted(&self) -> u128 {
        self.minted
    }

    #[must_use]
    pub fn total_burned(&self) -> u128 {
        self.burned
    }

    /// Check a measured supply against the recorded history.
    ///
    /// # Errors
    /// Returns [`PairswapError::SupplyInvariantViolation`] if they differ.
    pub fn verify(&self, asset: AssetId, actual_supply: u128) -> Result<()> {
        if self.burned > self.minted || actual_supply != self.expected_supply() {
            return Err(PairswapError::SupplyInvariantViolation {
                reason: format!(
                    "{asset}: actual supply {actual_supply} != expected {} \
                     (minted={}, burned={})",
                    self.expected_supply(),
                    self.minted,
                    self.burned,
                ),
            });
        }
        Ok(())
    }
}
