//! Native-asset entry points.
//!
//! A native pool pairs some asset with the ledger set's wrapped native
//! asset. Callers pay and receive native units; the pool itself only ever
//! holds the wrapped asset. Wrapping and unwrapping run inside the same
//! atomic call as the trade, so a failed call leaves native balances
//! untouched as well.
//!
//! Every entry point rejects pools that do not hold the wrapped native
//! asset with `NotNativePool`, and swaps reject a zero recipient.

use pairswap_ledger::Ledgers;
use pairswap_math::{amount_in, amount_out};
use pairswap_types::{Address, PairswapError, Result};

use crate::exact::{paying, LiquidityReceipt};
use crate::pool::{Pool, Reach, SwapReceipt};

impl Pool {
    fn native_side(&self, ledgers: &Ledgers) -> Result<usize> {
        ledgers
            .native_asset()
            .and_then(|native| self.pair().index_of(&native))
            .ok_or(PairswapError::NotNativePool(self.id()))
    }

    /// Whether one side of this pool is the wrapped native asset.
    #[must_use]
    pub fn is_native_pool(&self, ledgers: &Ledgers) -> bool {
        self.native_side(ledgers).is_ok()
    }

    fn checked_native_call(&self, ledgers: &Ledgers, to: &Address) -> Result<usize> {
        let native_side = self.native_side(ledgers)?;
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient("zero address"));
        }
        Ok(native_side)
    }

    /// Provision with native units on one side. `token_desired` is pulled
    /// from `caller` by allowance; the native part is wrapped straight into
    /// custody. Only the ratio-preserving amounts leave the caller.
    pub fn provide_liquidity_native(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        token_desired: u128,
        native_desired: u128,
        to: &Address,
    ) -> Result<LiquidityReceipt> {
        let native_side = self.native_side(ledgers)?;
        self.atomically(ledgers, Reach::Liquidity, "provide_liquidity_native", |pool, ledgers| {
            let (amount0, amount1) = if native_side == 0 {
                pool.optimal_amounts(native_desired, token_desired)?
            } else {
                pool.optimal_amounts(token_desired, native_desired)?
            };
            let (native_amount, token_amount) = if native_side == 0 {
                (amount0, amount1)
            } else {
                (amount1, amount0)
            };
            let token = pool.asset_at(1 - native_side);
            pool.pull(ledgers, &token, caller, token_amount)?;
            ledgers.wrap_native(caller, &pool.custody(), native_amount)?;
            let shares = pool.provision_inner(ledgers, caller, to)?;
            Ok(LiquidityReceipt {
                amount0,
                amount1,
                shares,
            })
        })
    }

    /// Sell exactly `native_in` native units for at least `min_amount_out`
    /// of the other asset.
    pub fn swap_exact_in_native_for_token(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        native_in: u128,
        min_amount_out: u128,
        to: &Address,
    ) -> Result<SwapReceipt> {
        let native_side = self.checked_native_call(ledgers, to)?;
        self.atomically(
            ledgers,
            Reach::Reserves,
            "swap_exact_in_native_for_token",
            |pool, ledgers| {
                let (reserve_in, reserve_out) = pool.directed_reserves(native_side);
                let out = amount_out(native_in, reserve_in, reserve_out, &pool.config().fee)?;
                if out < min_amount_out {
                    return Err(PairswapError::InsufficientOutputAmount);
                }
                ledgers.wrap_native(caller, &pool.custody(), native_in)?;
                pool.swap_inner(ledgers, caller, paying(1 - native_side, out, *to), None)
            },
        )
    }

    /// Buy exactly `amount_out` of the other asset, paying at most
    /// `max_native_in` native units.
    pub fn swap_exact_out_native_for_token(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        amount_out: u128,
        max_native_in: u128,
        to: &Address,
    ) -> Result<SwapReceipt> {
        let native_side = self.checked_native_call(ledgers, to)?;
        self.atomically(
            ledgers,
            Reach::Reserves,
            "swap_exact_out_native_for_token",
            |pool, ledgers| {
                let (reserve_in, reserve_out) = pool.directed_reserves(native_side);
                let needed = amount_in(amount_out, reserve_in, reserve_out, &pool.config().fee)?;
                if needed > max_native_in {
                    return Err(PairswapError::ExcessiveInputAmount {
                        needed,
                        max: max_native_in,
                    });
                }
                ledgers.wrap_native(caller, &pool.custody(), needed)?;
                pool.swap_inner(ledgers, caller, paying(1 - native_side, amount_out, *to), None)
            },
        )
    }

    /// Sell exactly `amount_in` of the other asset for at least
    /// `min_native_out` native units, released to `to`.
    ///
    /// Priced on what the pool received, like [`Pool::swap_exact_in`].
    pub fn swap_exact_in_token_for_native(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        amount_in: u128,
        min_native_out: u128,
        to: &Address,
    ) -> Result<SwapReceipt> {
        let native_side = self.checked_native_call(ledgers, to)?;
        self.atomically(
            ledgers,
            Reach::Reserves,
            "swap_exact_in_token_for_native",
            |pool, ledgers| {
                let token = pool.asset_at(1 - native_side);
                let (reserve_in, reserve_out) = pool.directed_reserves(1 - native_side);
                pool.pull(ledgers, &token, caller, amount_in)?;
                let received = ledgers
                    .balance_of(&token, &pool.custody())?
                    .checked_sub(reserve_in)
                    .ok_or_else(|| PairswapError::underflow("input balance below reserve"))?;
                let out = amount_out(received, reserve_in, reserve_out, &pool.config().fee)?;
                if out < min_native_out {
                    return Err(PairswapError::InsufficientOutputAmount);
                }
                let request = paying(native_side, out, *to);
                let receipt = pool.swap_inner(ledgers, caller, request, None)?;
                ledgers.unwrap_native(to, to, out)?;
                Ok(receipt)
            },
        )
    }

    /// Buy exactly `native_out` native units, paying at most
    /// `max_amount_in` of the other asset.
    pub fn swap_exact_out_token_for_native(
        &mut self,
        ledgers: &mut Ledgers,
        caller: &Address,
        native_out: u128,
        max_amount_in: u128,
        to: &Address,
    ) -> Result<SwapReceipt> {
        let native_side = self.checked_native_call(ledgers, to)?;
        self.atomically(
            ledgers,
            Reach::Reserves,
            "swap_exact_out_token_for_native",
            |pool, ledgers| {
                let token = pool.asset_at(1 - native_side);
                let (reserve_in, reserve_out) = pool.directed_reserves(1 - native_side);
                let needed = amount_in(native_out, reserve_in, reserve_out, &pool.config().fee)?;
                if needed > max_amount_in {
                    return Err(PairswapError::ExcessiveInputAmount {
                        needed,
                        max: max_amount_in,
                    });
                }
                pool.pull(ledgers, &token, caller, needed)?;
                let request = paying(native_side, native_out, *to);
                let receipt = pool.swap_inner(ledgers, caller, request, None)?;
                ledgers.unwrap_native(to, to, native_out)?;
                Ok(receipt)
            },
        )
    }
}
