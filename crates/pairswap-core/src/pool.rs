//! The pool engine.
//!
//! A [`Pool`] custodies two assets on their own ledgers and keeps:
//! - reserves and the cumulative price oracle ([`ReserveState`])
//! - the liquidity share ledger ([`ShareLedger`])
//! - `k_last` for protocol fee accrual
//! - an event log
//!
//! Every mutating entry point runs inside [`Pool::atomically`]: the state
//! the call can reach is snapshotted first and restored if the call fails,
//! so assets paid out optimistically during a swap, deposits made by a
//! flash callee, and emitted events all vanish together. What is copied
//! depends on the call's [`Reach`]: the pool's two asset ledgers by
//! default, every ledger when a flash callee runs, and the share ledger
//! only for liquidity calls.
//!
//! Events accumulate in the pool until [`Pool::drain_events`] takes them.
//! A pool whose events nobody drains should be given a cap with
//! [`Pool::set_event_capacity`].
//!
//! All operations take `&mut self`, so calls into one pool are serialized
//! by the borrow checker. No locks are involved.

use std::sync::Arc;

use pairswap_ledger::{LedgerSnapshot, Ledgers};
use pairswap_math::{check_invariant, mul_div, sqrt_product, InvariantInputs};
use pairswap_types::constants::MINIMUM_LIQUIDITY;
use pairswap_types::{
    Address, AssetId, AssetPair, EventRecord, PairswapError, PoolConfig, PoolEvent, PoolId,
    ProtocolFeeConfig, Result, SwapPhase,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::events::{EventLog, EventMark};
use crate::flash::{FlashCallback, FlashSwap};
use crate::protocol_fee::{self, ProtocolFeeAccrual};
use crate::reserves::{PriceCumulative, ReserveState, Reserves};
use crate::shares::ShareLedger;

/// Outputs requested from a swap. Inputs are whatever the pool finds in
/// its balances afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub amount0_out: u128,
    pub amount1_out: u128,
    pub to: Address,
}

impl SwapRequest {
    #[must_use]
    pub fn new(amount0_out: u128, amount1_out: u128, to: Address) -> Self {
        Self {
            amount0_out,
            amount1_out,
            to,
        }
    }
}

/// What a committed swap moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub amount0_in: u128,
    pub amount1_in: u128,
    pub amount0_out: u128,
    pub amount1_out: u128,
}

/// Mutable pool state.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PoolState {
    reserves: ReserveState,
    shares: ShareLedger,
    k_last: U256,
}

/// What a call can modify, and therefore what it must snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
    /// Reserves and the pool's two asset ledgers.
    Reserves,
    /// As `Reserves`, plus the share ledger and `k_last`.
    Liquidity,
    /// Reserves and every ledger, since a flash callee may touch any of
    /// them. The callee cannot reach this pool's shares.
    Flash,
}

/// Everything needed to undo a failed call.
struct Undo {
    reserves: ReserveState,
    liquidity: Option<(ShareLedger, U256)>,
    events: EventMark,
    ledgers: LedgerSnapshot,
}

/// A constant-product pool over one asset pair.
#[derive(Debug)]
pub struct Pool {
    id: PoolId,
    pair: AssetPair,
    custody: Address,
    config: PoolConfig,
    state: PoolState,
    events: EventLog,
    clock: Arc<dyn Clock>,
}

impl Pool {
    /// Initialize an empty pool for `pair`. Reserves and shares start at zero.
    ///
    /// # Errors
    /// `Configuration` if `config` does not validate.
    pub fn new(pair: AssetPair, config: PoolConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let id = PoolId::for_pair(&pair);
        Ok(Self {
            id,
            pair,
            custody: id.address(),
            config,
            state: PoolState {
                reserves: ReserveState::default(),
                shares: ShareLedger::new(),
                k_last: U256::zero(),
            },
            events: EventLog::new(id),
            clock,
        })
    }

    // =================================================================
    // Accessors
    // =================================================================

    #[must_use]
    pub fn id(&self) -> PoolId {
        self.id
    }

    #[must_use]
    pub fn pair(&self) -> AssetPair {
        self.pair
    }

    #[must_use]
    pub fn asset0(&self) -> AssetId {
        self.pair.asset0()
    }

    #[must_use]
    pub fn asset1(&self) -> AssetId {
        self.pair.asset1()
    }

    /// The pool's holder address on both asset ledgers.
    #[must_use]
    pub fn custody(&self) -> Address {
        self.custody
    }

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    #[must_use]
    pub fn protocol_fee(&self) -> &ProtocolFeeConfig {
        &self.config.protocol_fee
    }

    #[must_use]
    pub fn reserves(&self) -> Reserves {
        self.state.reserves.reserves()
    }

    #[must_use]
    pub fn price_cumulative_last(&self) -> PriceCumulative {
        self.state.reserves.cumulative()
    }

    /// `reserve0 * reserve1` after the last liquidity event, while the
    /// protocol fee is on. Zero otherwise.
    #[must_use]
    pub fn k_last(&self) -> U256 {
        self.state.k_last
    }

    #[must_use]
    pub fn total_shares(&self) -> u128 {
        self.state.shares.total_supply()
    }

    #[must_use]
    pub fn share_balance(&self, holder: &Address) -> u128 {
        self.state.shares.balance_of(holder)
    }

    #[must_use]
    pub fn share_allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.state.shares.allowance(owner, spender)
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }

    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.events.drain()
    }

    /// Keep at most `capacity` buffered events, dropping the oldest after
    /// each call. `None` (the default) buffers until drained.
    pub fn set_event_capacity(&mut self, capacity: Option<usize>) {
        self.events.set_capacity(capacity);
    }

    /// Events dropped by the capacity limit so far.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Check `Σ share balances == total shares`.
    pub fn verify_share_conservation(&self) -> Result<()> {
        self.state.shares.verify_conservation()
    }

    /// True custodied balances of both assets.
    pub fn balances(&self, ledgers: &Ledgers) -> Result<(u128, u128)> {
        Ok((
            ledgers.balance_of(&self.pair.asset0(), &self.custody)?,
            ledgers.balance_of(&self.pair.asset1(), &self.custody)?,
        ))
    }

    // =================================================================
    // Atomicity
    // =================================================================

    /// Run `op` so that it either fully succeeds or leaves no trace in the
    /// pool state, its events or the ledgers it can reach.
    pub(crate) fn atomically<T>(
        &mut self,
        ledgers: &mut Ledgers,
        reach: Reach,
        op: &'static str,
        f: impl FnOnce(&mut Self, &mut Ledgers) -> Result<T>,
    ) -> Result<T> {
        let undo = self.undo_for(ledgers, reach);
        match f(self, ledgers) {
            Ok(value) => {
                self.events.enforce_capacity();
                Ok(value)
            }
            Err(err) => {
                self.state.reserves = undo.reserves;
                if let Some((shares, k_last)) = undo.liquidity {
                    self.state.shares = shares;
                    self.state.k_last = k_last;
                }
                self.events.rollback(undo.events);
                ledgers.restore(undo.ledgers);
                tracing::warn!(pool = %self.id, op, error = %err, "Call rolled back");
                Err(err)
            }
        }
    }

    fn undo_for(&self, ledgers: &Ledgers, reach: Reach) -> Undo {
        let snapshot = match reach {
            Reach::Flash => ledgers.snapshot(),
            Reach::Reserves | Reach::Liquidity => {
                ledgers.snapshot_assets(&[self.pair.asset0(), self.pair.asset1()])
            }
        };
        let liquidity = (reach == Reach::Liquidity)
            .then(|| (self.state.shares.clone(), self.state.k_last));
        Undo {
            reserves: self.state.reserves.clone(),
            liquidity,
            events: self.events.mark(),
            ledgers: snapshot,
        }
    }

    fn emit(&mut self, event: PoolEvent) {
        let now = self.clock.now();
        self.events.emit(event, now);
    }

    // =================================================================
    // Sync
    // =================================================================

    /// Overwrite reserves with the true custodied balances and advance the
    /// price accumulators. Idempotent for a fixed timestamp.
    ///
    /// # Errors
    /// `Overflow` if a balance exceeds `2^112 - 1`.
    pub fn sync(&mut self, ledgers: &mut Ledgers) -> Result<()> {
        self.atomically(ledgers, Reach::Reserves, "sync", |pool, ledgers| {
            pool.sync_inner(ledgers)
        })
    }

    fn sync_inner(&mut self, ledgers: &Ledgers) -> Result<()> {
        let (balance0, balance1) = self.balances(ledgers)?;
        self.update_reserves(balance0, balance1)
    }

    fn update_reserves(&mut self, balance0: u128, balance1: u128) -> Result<()> {
        let now = self.clock.now();
        self.state.reserves.update(balance0, balance1, now)?;
        tracing::debug!(
            pool = %self.id,
            reserve0 = balance0,
            reserve1 = balance1,
            now,
            "Reserves synced"
        );
        self.emit(PoolEvent::Sync {
            reserve0: balance0,
            reserve1: balance1,
        });
        Ok(())
    }

    // =================================================================
    // Liquidity
    // =================================================================

    /// Mint shares for assets already deposited into the pool's custody.
    ///
    /// The deposit is whatever the balances exceed the reserves by. The
    /// first provision mints `isqrt(a0 * a1) - MINIMUM_LIQUIDITY` to `to`
    /// and locks `MINIMUM_LIQUIDITY` with [`Address::ZERO`] forever. Later
    /// provisions mint in proportion to the smaller contribution ratio, so
    /// any excess of the other asset is donated to existing holders.
    ///
    /// # Errors
    /// - `InvalidRecipient` if `to` is the zero address
    /// - `InsufficientLiquidityMinted` if the result is zero shares
    /// - `Underflow` if a balance is below its reserve
    /// - `Overflow` if the new balances exceed 112 bits
    pub fn provision(
        &mut self,
        ledgers: &mut Ledgers,
        sender: &Address,
        to: &Address,
    ) -> Result<u128> {
        self.atomically(ledgers, Reach::Liquidity, "provision", |pool, ledgers| {
            pool.provision_inner(ledgers, sender, to)
        })
    }

    pub(crate) fn provision_inner(
        &mut self,
        ledgers: &Ledgers,
        sender: &Address,
        to: &Address,
    ) -> Result<u128> {
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient("zero address"));
        }
        let reserves = self.reserves();
        let (balance0, balance1) = self.balances(ledgers)?;
        let amount0 = balance0
            .checked_sub(reserves.reserve0)
            .ok_or_else(|| PairswapError::underflow("balance0 below reserve0"))?;
        let amount1 = balance1
            .checked_sub(reserves.reserve1)
            .ok_or_else(|| PairswapError::underflow("balance1 below reserve1"))?;

        let fee = self.accrue_protocol_fee(&reserves)?;
        let total = self.state.shares.total_supply();

        let shares = if total == 0 {
            let root = sqrt_product(amount0, amount1);
            let shares = root
                .checked_sub(MINIMUM_LIQUIDITY)
                .filter(|s| *s > 0)
                .ok_or(PairswapError::InsufficientLiquidityMinted)?;
            self.state.shares.mint(&Address::ZERO, MINIMUM_LIQUIDITY)?;
            self.emit(PoolEvent::SharesMinted {
                to: Address::ZERO,
                amount: MINIMUM_LIQUIDITY,
            });
            shares
        } else {
            let by0 = mul_div(amount0, total, reserves.reserve0)?;
            let by1 = mul_div(amount1, total, reserves.reserve1)?;
            by0.min(by1)
        };
        if shares == 0 {
            return Err(PairswapError::InsufficientLiquidityMinted);
        }

        self.state.shares.mint(to, shares)?;
        self.emit(PoolEvent::SharesMinted {
            to: *to,
            amount: shares,
        });
        self.update_reserves(balance0, balance1)?;
        if fee.is_some() {
            self.state.k_last = protocol_fee::product(&self.reserves());
        }

        self.emit(PoolEvent::Provision {
            sender: *sender,
            to: *to,
            amount0,
            amount1,
            shares,
        });
        tracing::info!(
            pool = %self.id,
            sender = %sender.short(),
            to = %to.short(),
            amount0,
            amount1,
            shares,
            total_shares = self.state.shares.total_supply(),
            "Liquidity provisioned"
        );
        Ok(shares)
    }

    /// Burn `shares` owned by `owner` and pay the pro-rata part of the
    /// pool's true balances to `to`. Donations made since the last sync are
    /// included in the payout.
    ///
    /// # Errors
    /// - `SharesLocked` if `owner` is the zero address
    /// - `InsufficientShares` if `owner` holds fewer than `shares`
    /// - `InvalidRecipient` if `to` is the zero address
    /// - `InsufficientLiquidityBurned` if either payout rounds to zero
    pub fn remove(
        &mut self,
        ledgers: &mut Ledgers,
        owner: &Address,
        shares: u128,
        to: &Address,
    ) -> Result<(u128, u128)> {
        self.atomically(ledgers, Reach::Liquidity, "remove", |pool, ledgers| {
            pool.remove_inner(ledgers, owner, shares, to)
        })
    }

    fn remove_inner(
        &mut self,
        ledgers: &mut Ledgers,
        owner: &Address,
        shares: u128,
        to: &Address,
    ) -> Result<(u128, u128)> {
        if owner.is_zero() {
            return Err(PairswapError::SharesLocked);
        }
        let held = self.state.shares.balance_of(owner);
        if held < shares {
            return Err(PairswapError::InsufficientShares {
                needed: shares,
                available: held,
            });
        }
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient("zero address"));
        }

        let reserves = self.reserves();
        let (balance0, balance1) = self.balances(ledgers)?;
        let fee = self.accrue_protocol_fee(&reserves)?;
        let total = self.state.shares.total_supply();

        let amount0 = mul_div(shares, balance0, total)?;
        let amount1 = mul_div(shares, balance1, total)?;
        if amount0 == 0 || amount1 == 0 {
            return Err(PairswapError::InsufficientLiquidityBurned);
        }

        self.state.shares.burn(owner, shares)?;
        self.emit(PoolEvent::SharesBurned {
            from: *owner,
            amount: shares,
        });
        ledgers.transfer(&self.pair.asset0(), &self.custody, to, amount0)?;
        ledgers.transfer(&self.pair.asset1(), &self.custody, to, amount1)?;

        self.sync_inner(ledgers)?;
        if fee.is_some() {
            self.state.k_last = protocol_fee::product(&self.reserves());
        }

        self.emit(PoolEvent::Removal {
            sender: *owner,
            to: *to,
            amount0,
            amount1,
            shares,
        });
        tracing::info!(
            pool = %self.id,
            owner = %owner.short(),
            to = %to.short(),
            amount0,
            amount1,
            shares,
            total_shares = self.state.shares.total_supply(),
            "Liquidity removed"
        );
        Ok((amount0, amount1))
    }

    // =================================================================
    // Swap
    // =================================================================

    /// Pay out the requested amounts, optionally hand control to a flash
    /// callee, then accept the post-state only if the fee-adjusted reserve
    /// product did not decrease.
    ///
    /// # Errors
    /// - `InsufficientOutputAmount` if both outputs are zero
    /// - `InsufficientLiquidity` if an output reaches its reserve
    /// - `InvalidRecipient` if `to` is zero or one of the asset ledgers
    /// - `CallbackFailed` if the flash callee returns an error
    /// - `InsufficientInputAmount` if nothing was paid in
    /// - `InvariantViolation` if the pool was not repaid enough
    pub fn swap(
        &mut self,
        ledgers: &mut Ledgers,
        sender: &Address,
        request: SwapRequest,
        callback: Option<FlashCallback<'_>>,
    ) -> Result<SwapReceipt> {
        let reach = if callback.is_some() {
            Reach::Flash
        } else {
            Reach::Reserves
        };
        self.atomically(ledgers, reach, "swap", |pool, ledgers| {
            pool.swap_inner(ledgers, sender, request, callback)
        })
    }

    pub(crate) fn swap_inner(
        &mut self,
        ledgers: &mut Ledgers,
        sender: &Address,
        request: SwapRequest,
        callback: Option<FlashCallback<'_>>,
    ) -> Result<SwapReceipt> {
        let SwapRequest {
            amount0_out,
            amount1_out,
            to,
        } = request;
        if amount0_out == 0 && amount1_out == 0 {
            return Err(PairswapError::InsufficientOutputAmount);
        }
        let reserves = self.reserves();
        if amount0_out >= reserves.reserve0 || amount1_out >= reserves.reserve1 {
            return Err(PairswapError::InsufficientLiquidity);
        }
        if to.is_zero() {
            return Err(PairswapError::invalid_recipient("zero address"));
        }
        if self.pair.is_ledger_address(&to) {
            return Err(PairswapError::invalid_recipient("asset ledger address"));
        }

        let has_callback = callback.is_some();
        let mut phase = SwapPhase::Payout;
        self.trace_phase(phase);
        let asset0 = self.pair.asset0();
        let asset1 = self.pair.asset1();
        if amount0_out > 0 {
            ledgers.transfer(&asset0, &self.custody, &to, amount0_out)?;
        }
        if amount1_out > 0 {
            ledgers.transfer(&asset1, &self.custody, &to, amount1_out)?;
        }

        phase = self.advance(phase, has_callback);
        if let Some(FlashCallback { callee, data }) = callback {
            let flash = FlashSwap {
                pool: self.id,
                custody: self.custody,
                sender: *sender,
                asset0,
                asset1,
                amount0_out,
                amount1_out,
                data,
            };
            callee
                .on_flash_swap(ledgers, &flash)
                .map_err(|err| PairswapError::CallbackFailed {
                    reason: err.to_string(),
                })?;
            phase = self.advance(phase, has_callback);
        }

        debug_assert_eq!(phase, SwapPhase::Reconciliation);
        let (balance0, balance1) = self.balances(ledgers)?;
        let amount0_in = received(balance0, reserves.reserve0, amount0_out);
        let amount1_in = received(balance1, reserves.reserve1, amount1_out);
        if amount0_in == 0 && amount1_in == 0 {
            return Err(PairswapError::InsufficientInputAmount);
        }

        phase = self.advance(phase, has_callback);
        let inputs = InvariantInputs {
            balance0,
            balance1,
            amount0_in,
            amount1_in,
            reserve0: reserves.reserve0,
            reserve1: reserves.reserve1,
        };
        if let Err(err) = check_invariant(&inputs, &self.config.fee) {
            tracing::warn!(
                pool = %self.id,
                amount0_in,
                amount1_in,
                amount0_out,
                amount1_out,
                "Invariant check rejected swap"
            );
            return Err(err);
        }

        phase = self.advance(phase, has_callback);
        self.update_reserves(balance0, balance1)?;
        self.emit(PoolEvent::Swap {
            sender: *sender,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });
        tracing::info!(
            pool = %self.id,
            phase = %phase,
            sender = %sender.short(),
            to = %to.short(),
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            flash = has_callback,
            "Swap executed"
        );
        Ok(SwapReceipt {
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
        })
    }

    fn trace_phase(&self, phase: SwapPhase) {
        tracing::debug!(pool = %self.id, phase = %phase, "Swap phase");
    }

    fn advance(&self, phase: SwapPhase, has_callback: bool) -> SwapPhase {
        let next = phase.next(has_callback).unwrap_or(SwapPhase::Commit);
        self.trace_phase(next);
        next
    }

    // =================================================================
    // Protocol fee
    // =================================================================

    fn accrue_protocol_fee(
        &mut self,
        reserves: &Reserves,
    ) -> Result<Option<ProtocolFeeAccrual>> {
        let accrual = protocol_fee::accrue(
            &self.config.protocol_fee,
            &mut self.state.k_last,
            reserves,
            &mut self.state.shares,
        )?;
        if let Some(ProtocolFeeAccrual { recipient, minted }) = accrual {
            if minted > 0 {
                self.emit(PoolEvent::SharesMinted {
                    to: recipient,
                    amount: minted,
                });
                tracing::info!(
                    pool = %self.id,
                    recipient = %recipient.short(),
                    minted,
                    "Protocol fee accrued"
                );
            }
        }
        Ok(accrual)
    }

    /// Switch the protocol fee on, off, or to a new recipient. Turning it
    /// off clears `k_last`; turning it on starts accruing from the next
    /// liquidity event.
    pub fn set_protocol_fee(&mut self, config: ProtocolFeeConfig) -> Result<()> {
        config.validate()?;
        if !config.is_enabled() {
            self.state.k_last = U256::zero();
        }
        self.config.protocol_fee = config;
        tracing::info!(
            pool = %self.id,
            enabled = config.is_enabled(),
            "Protocol fee updated"
        );
        Ok(())
    }

    // =================================================================
    // Share transfers
    // =================================================================

    pub fn transfer_shares(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.state.shares.transfer(from, to, amount)?;
        self.emit(PoolEvent::SharesTransferred {
            from: *from,
            to: *to,
            amount,
        });
        self.events.enforce_capacity();
        Ok(())
    }

    pub fn approve_shares(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<()> {
        self.state.shares.approve(owner, spender, amount)
    }

    pub fn transfer_shares_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.state.shares.transfer_from(spender, from, to, amount)?;
        self.emit(PoolEvent::SharesTransferred {
            from: *from,
            to: *to,
            amount,
        });
        self.events.enforce_capacity();
        Ok(())
    }
}

/// Input credited on one side: `max(0, balance - (reserve - out))`.
fn received(balance: u128, reserve: u128, out: u128) -> u128 {
    balance.saturating_sub(reserve - out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use pairswap_ledger::{StandardToken, TokenLedger};

    fn setup() -> (Pool, Ledgers, Address) {
        let (ledgers, assets) = Ledgers::with_standard_tokens(&["A", "B"]);
        let pair = AssetPair::new(assets[0], assets[1]).unwrap();
        let pool = Pool::new(pair, PoolConfig::default(), Arc::new(ManualClock::new(1_000))).unwrap();
        (pool, ledgers, Address::from_label("alice"))
    }

    fn deposit(pool: &Pool, ledgers: &mut Ledgers, amount0: u128, amount1: u128) {
        ledgers.mint(&pool.asset0(), &pool.custody(), amount0).unwrap();
        ledgers.mint(&pool.asset1(), &pool.custody(), amount1).unwrap();
    }

    #[test]
    fn first_provision_locks_minimum() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        let shares = pool.provision(&mut ledgers, &alice, &alice).unwrap();
        assert_eq!(shares, 1000);
        assert_eq!(pool.share_balance(&Address::ZERO), MINIMUM_LIQUIDITY);
        assert_eq!(pool.total_shares(), 2000);
        assert_eq!(pool.reserves().reserve0, 2000);
        pool.verify_share_conservation().unwrap();
    }

    #[test]
    fn provision_to_zero_rejected() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        let err = pool.provision(&mut ledgers, &alice, &Address::ZERO).unwrap_err();
        assert!(matches!(err, PairswapError::InvalidRecipient { .. }));
        assert_eq!(pool.total_shares(), 0);
    }

    #[test]
    fn swap_rollback_restores_everything() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        let events_before = pool.events().len();

        // Pay in 100 of asset0: not enough for 100 out of asset1.
        ledgers.mint(&pool.asset0(), &alice, 100).unwrap();
        ledgers
            .transfer(&pool.asset0(), &alice, &pool.custody(), 100)
            .unwrap();
        let err = pool
            .swap(&mut ledgers, &alice, SwapRequest::new(0, 100, alice), None)
            .unwrap_err();
        assert!(matches!(err, PairswapError::InvariantViolation { .. }));
        assert_eq!(ledgers.balance_of(&pool.asset1(), &alice).unwrap(), 0);
        assert_eq!(pool.reserves().reserve1, 2000);
        assert_eq!(pool.events().len(), events_before);
    }

    #[test]
    fn swap_recipient_checks() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        let ledger_addr = pool.asset0().ledger_address();
        for to in [Address::ZERO, ledger_addr] {
            let err = pool
                .swap(&mut ledgers, &alice, SwapRequest::new(0, 1, to), None)
                .unwrap_err();
            assert!(matches!(err, PairswapError::InvalidRecipient { .. }));
        }
    }

    #[test]
    fn swap_output_bounds() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        assert!(matches!(
            pool.swap(&mut ledgers, &alice, SwapRequest::new(0, 0, alice), None),
            Err(PairswapError::InsufficientOutputAmount)
        ));
        assert!(matches!(
            pool.swap(&mut ledgers, &alice, SwapRequest::new(2000, 0, alice), None),
            Err(PairswapError::InsufficientLiquidity)
        ));
        assert!(matches!(
            pool.swap(&mut ledgers, &alice, SwapRequest::new(1, 0, alice), None),
            Err(PairswapError::InsufficientInputAmount)
        ));
    }

    #[test]
    fn remove_by_locked_holder_rejected() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        assert!(matches!(
            pool.remove(&mut ledgers, &Address::ZERO, 1, &alice),
            Err(PairswapError::SharesLocked)
        ));
    }

    #[test]
    fn share_transfer_emits_event() {
        let (mut pool, mut ledgers, alice) = setup();
        deposit(&pool, &mut ledgers, 2000, 2000);
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        let bob = Address::from_label("bob");
        pool.transfer_shares(&alice, &bob, 400).unwrap();
        assert_eq!(pool.share_balance(&bob), 400);
        let last = pool.events().last().unwrap();
        assert_eq!(last.kind(), pairswap_types::EventKind::SharesTransferred);
    }

    #[test]
    fn undo_copies_only_what_the_call_reaches() {
        let (pool, mut ledgers, _) = setup();
        ledgers.register(StandardToken::labeled("C")).unwrap();

        let undo = pool.undo_for(&ledgers, Reach::Reserves);
        assert_eq!(undo.ledgers.len(), 2);
        assert!(undo.liquidity.is_none());
        let undo = pool.undo_for(&ledgers, Reach::Liquidity);
        assert_eq!(undo.ledgers.len(), 2);
        assert!(undo.liquidity.is_some());
        let undo = pool.undo_for(&ledgers, Reach::Flash);
        assert_eq!(undo.ledgers.len(), 3);
        assert!(undo.liquidity.is_none());
    }

    #[test]
    fn provision_overflow_restores_shares() {
        let (mut pool, mut ledgers, alice) = setup();
        let too_big = pairswap_types::constants::MAX_RESERVE + 1;
        deposit(&pool, &mut ledgers, too_big, too_big);
        let err = pool.provision(&mut ledgers, &alice, &alice).unwrap_err();
        assert!(matches!(err, PairswapError::Overflow { .. }));
        assert_eq!(pool.total_shares(), 0);
        assert_eq!(pool.share_balance(&Address::ZERO), 0);
        assert!(pool.events().is_empty());
        pool.verify_share_conservation().unwrap();
    }

    #[test]
    fn flash_rollback_restores_ledgers_outside_the_pair() {
        let (mut pool, mut ledgers, alice) = setup();
        let other = ledgers.register(StandardToken::labeled("C")).unwrap();
        deposit(&pool, &mut ledgers, 2000, 2000);
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        ledgers.mint(&other, &alice, 50).unwrap();

        let bob = Address::from_label("bob");
        let mut side_trade = |ledgers: &mut Ledgers, _: &FlashSwap| -> Result<()> {
            ledgers.transfer(&other, &alice, &bob, 50)?;
            Err(PairswapError::Internal("abandoned".into()))
        };
        let err = pool
            .swap(
                &mut ledgers,
                &alice,
                SwapRequest::new(0, 10, alice),
                Some(FlashCallback::new(&mut side_trade, Vec::new())),
            )
            .unwrap_err();
        assert!(matches!(err, PairswapError::CallbackFailed { .. }));
        assert_eq!(ledgers.balance_of(&other, &alice).unwrap(), 50);
        assert_eq!(ledgers.balance_of(&other, &bob).unwrap(), 0);
    }

    #[test]
    fn event_capacity_applies_after_each_call() {
        let (mut pool, mut ledgers, alice) = setup();
        pool.set_event_capacity(Some(3));
        deposit(&pool, &mut ledgers, 2000, 2000);
        // Locked mint, mint, sync, provision.
        pool.provision(&mut ledgers, &alice, &alice).unwrap();
        assert_eq!(pool.events().len(), 3);
        assert_eq!(pool.dropped_events(), 1);
        assert_eq!(pool.events()[0].sequence, 1);

        pool.transfer_shares(&alice, &Address::from_label("bob"), 1).unwrap();
        assert_eq!(pool.events().len(), 3);
        assert_eq!(pool.events()[2].sequence, 4);
        assert_eq!(pool.dropped_events(), 2);
    }

    #[test]
    fn unregistered_asset_surfaces() {
        let a = StandardToken::labeled("A");
        let pair = AssetPair::new(a.asset(), AssetId::from_label("MISSING")).unwrap();
        let mut pool = Pool::new(pair, PoolConfig::default(), Arc::new(ManualClock::new(0))).unwrap();
        let mut ledgers = Ledgers::new();
        ledgers.register(a).unwrap();
        assert!(matches!(
            pool.sync(&mut ledgers),
            Err(PairswapError::UnknownAsset(_))
        ));
    }
}
