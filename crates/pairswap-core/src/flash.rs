//! Flash swaps.
//!
//! A swap pays out before it verifies. When the caller supplies a
//! [`FlashCallback`], the pool hands control to the callee between payout
//! and verification; the callee may use the borrowed assets however it
//! likes and must leave the pool repaid (in either asset) by the time it
//! returns.
//!
//! The callee receives `&mut Ledgers` and nothing else from the pool. The
//! pool that is mid-swap is exclusively borrowed for the duration, so the
//! callee cannot reach it: re-entry is ruled out by ownership. Other pools
//! the callee owns are independent values; if the outer swap fails, the
//! ledger set is restored but the callee is responsible for its own pools.

use pairswap_ledger::Ledgers;
use pairswap_types::{Address, AssetId, PoolId, Result};

/// What the callee is told about the swap in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSwap {
    pub pool: PoolId,
    /// Where repayment must be sent.
    pub custody: Address,
    pub sender: Address,
    pub asset0: AssetId,
    pub asset1: AssetId,
    pub amount0_out: u128,
    pub amount1_out: u128,
    /// Opaque payload forwarded from the caller.
    pub data: Vec<u8>,
}

/// Receives control between payout and verification.
pub trait FlashSwapCallee {
    /// # Errors
    /// Any error aborts the swap and rolls back every effect.
    fn on_flash_swap(&mut self, ledgers: &mut Ledgers, swap: &FlashSwap) -> Result<()>;
}

impl<F> FlashSwapCallee for F
where
    F: FnMut(&mut Ledgers, &FlashSwap) -> Result<()>,
{
    fn on_flash_swap(&mut self, ledgers: &mut Ledgers, swap: &FlashSwap) -> Result<()> {
        self(ledgers, swap)
    }
}

/// A callee plus the payload it should receive.
pub struct FlashCallback<'a> {
    pub callee: &'a mut dyn FlashSwapCallee,
    pub data: Vec<u8>,
}

impl<'a> FlashCallback<'a> {
    pub fn new(callee: &'a mut dyn FlashSwapCallee, data: impl Into<Vec<u8>>) -> Self {
        Self {
            callee,
            data: data.into(),
        }
    }
}

impl std::fmt::Debug for FlashCallback<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashCallback")
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}
