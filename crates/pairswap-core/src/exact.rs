//! Pull-based entry points.
//!
//! The core operations expect assets to be deposited before the call. These
//! helpers do the deposit themselves: they quote against current reserves,
//! pull the caller's assets with `transfer_from` (the pool's custody
//! address is the spender, so the caller must have approved it), and then
//! run the core operation, all inside one atomic call.

use pairswap_ledger::Ledgers;
use pairswap_math::{amount_in, amount_out, quote};
use pairswap_types::{Address, AssetId, PairswapError, Result};
use serde::{Deserialize, Serialize};

use crate::pool::{Pool, Reach, SwapReceipt, SwapRequest};

/// What a pull-based provision deposited and minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityReceipt {
    pub amount0: u128,
    pub amount1: u128,
    pub shares: u128,
}

impl Pool {
    /// Which side `asset` is on.
    pub(crate) fn side_of(&self, asset: &AssetId) -> Result<usize> {
        self.pair()
            .index_of(asset)
            .ok_or_else(|| PairswapError::InvalidAsset {
                reason: format!("{asset} is not part of {}", self.pair()),
            })
    }

    pub(crate) fn asset_at(&self, side: usize) -> AssetId {
        if side == 0 { self.asset0() } else { self.asset1() }
    }

    /// `(reserve_in, reserve_out)` when trading into `side_in`.
    pub(crate) fn directed_reserves(&self, side_in: usize) -> (u128, u128) {
        let r = self.reserves();
        if side_in == 0 {
            (r.reserve0, r.reserve1)
        } else {
            (r.reserve1, r.reserve0)
        }
    }

    pub(crate) fn pull(&self, ledgers: &mut Ledgers, asset: &AssetId, from: &Address, amount: u128) -> Result<()> {
        let custody = self.custody();
        ledgers.transfer_from(asset, &custody, from, &custody, amount)
    }

    /// Amounts to deposit for a ratio-preserving provision no larger than
    /// the desired amounts. An empty pool takes both as given.
    pub fn optimal_amounts(&self, amount0_desired: u128, amount1_desired: u128) -> Result<(u128, u128)> {
        let r = self.reserves();
        if r.is_empty() {
            return Ok((amount0_desired, amount1_desired));
        }
        let amount1_optimal = quote(amount0_desired, r.reserve0, r.reserve1)?;
        if amount1_optimal <= amount1_desired {
            return Ok((amount0_desired, amount1_optimal));
        }
        let amount0_optimal = quote(amount1_desired, r.reserve1, r.reserve0)?;
        Ok((amount0_optimal.min(amount0_desired), amount1_desired))
    }

    /// Pull a ratio-preserving deposit from `caller` and provision it.
    pub fn provide_liquidity(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        amount0_desired: u128,
        amount1_desired: u128,
        to: &Address,
    ) -> Result<LiquidityReceipt> {
        self.atomically(ledgers, Reach::Liquidity, "provide_liquidity", |pool, ledgers| {
            let (amount0, amount1) = pool.optimal_amounts(amount0_desired, amount1_desired)?;
            pool.pull(ledgers, &pool.asset0(), caller, amount0)?;
            pool.pull(ledgers, &pool.asset1(), caller, amount1)?;
            let shares = pool.provision_inner(ledgers, caller, to)?;
            Ok(LiquidityReceipt {
                amount0,
                amount1,
                shares,
            })
        })
    }

    /// Output a swap of exactly `amount_in` of `asset_in` would receive.
    pub fn quote_exact_in(&self, asset_in: &AssetId, amount_in: u128) -> Result<u128> {
        let side = self.side_of(asset_in)?;
        let (reserve_in, reserve_out) = self.directed_reserves(side);
        amount_out(amount_in, reserve_in, reserve_out, &self.config().fee)
    }

    /// Input needed to receive exactly `amount_out` of `asset_out`.
    pub fn quote_exact_out(&self, asset_out: &AssetId, amount_out: u128) -> Result<u128> {
        let side_out = self.side_of(asset_out)?;
        let (reserve_in, reserve_out) = self.directed_reserves(1 - side_out);
        amount_in(amount_out, reserve_in, reserve_out, &self.config().fee)
    }

    /// Sell exactly `amount_in` of `asset_in`, receiving at least
    /// `min_amount_out` of the other asset at `to`.
    ///
    /// The output is priced on what the pool actually received, so assets
    /// that charge a fee on transfer still trade.
    pub fn swap_exact_in(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        asset_in: &AssetId,
        amount_in: u128,
        min_amount_out: u128,
        to: &Address,
    ) -> Result<SwapReceipt> {
        let side_in = self.side_of(asset_in)?;
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient("zero address"));
        }
        self.atomically(ledgers, Reach::Reserves, "swap_exact_in", |pool, ledgers| {
            let (reserve_in, reserve_out) = pool.directed_reserves(side_in);
            pool.pull(ledgers, asset_in, caller, amount_in)?;
            let balance_in = ledgers.balance_of(asset_in, &pool.custody())?;
            let received = balance_in
                .checked_sub(reserve_in)
                .ok_or_else(|| PairswapError::underflow("input balance below reserve"))?;
            let out = amount_out(received, reserve_in, reserve_out, &pool.config().fee)?;
            if out < min_amount_out {
                return Err(PairswapError::InsufficientOutputAmount);
            }
            pool.swap_inner(ledgers, caller, paying(1 - side_in, out, *to), None)
        })
    }

    /// Buy exactly `amount_out` of `asset_out`, paying at most
    /// `max_amount_in` of the other asset.
    pub fn swap_exact_out(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        asset_out: &AssetId,
        amount_out: u128,
        max_amount_in: u128,
        to: &Address,
    ) -> Result<SwapReceipt> {
        let side_out = self.side_of(asset_out)?;
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient("zero address"));
        }
        self.atomically(ledgers, Reach::Reserves, "swap_exact_out", |pool, ledgers| {
            let needed = pool.quote_exact_out(asset_out, amount_out)?;
            if needed > max_amount_in {
                return Err(PairswapError::ExcessiveInputAmount {
                    needed,
                    max: max_amount_in,
                });
            }
            let asset_in = pool.asset_at(1 - side_out);
            pool.pull(ledgers, &asset_in, caller, needed)?;
            pool.swap_inner(ledgers, caller, paying(side_out, amount_out, *to), None)
        })
    }
}

/// Request paying `amount` of the asset on `side_out` to `to`.
pub(crate) fn paying(side_out: usize, amount: u128, to: Address) -> SwapRequest {
    if side_out == 0 {
        SwapRequest::new(amount, 0, to)
    } else {
        SwapRequest::new(0, amount, to)
    }
}
