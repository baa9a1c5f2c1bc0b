//! Reserve and oracle state.
//!
//! Reserves are the pool's own record of what it custodies. They only
//! change in [`ReserveState::update`], which also advances the cumulative
//! price accumulators by the time-weighted price of the *previous* reserves.

use pairswap_math::uq112x112;
use pairswap_types::constants::MAX_RESERVE;
use pairswap_types::{PairswapError, Result};
use primitive_types::U256;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reserves as last synced (the pool's `getReserves` view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: u128,
    pub reserve1: u128,
    pub last_sync_time: u64,
}

impl Reserves {
    /// Spot price of asset0 in units of asset1, for display and logs.
    /// `None` when a reserve is zero or too wide for `Decimal`.
    #[must_use]
    pub fn spot_price0(&self) -> Option<Decimal> {
        spot(self.reserve1, self.reserve0)
    }

    /// Spot price of asset1 in units of asset0.
    #[must_use]
    pub fn spot_price1(&self) -> Option<Decimal> {
        spot(self.reserve0, self.reserve1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reserve0 == 0 || self.reserve1 == 0
    }
}

fn spot(numerator: u128, denominator: u128) -> Option<Decimal> {
    let n = Decimal::from_u128(numerator)?;
    let d = Decimal::from_u128(denominator)?;
    n.checked_div(d)
}

/// UQ112x112 cumulative prices. Only differences between two readings are
/// meaningful; the values wrap modulo 2^256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceCumulative {
    /// Σ (reserve1 / reserve0) · Δt
    pub price0: U256,
    /// Σ (reserve0 / reserve1) · Δt
    pub price1: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReserveState {
    reserve0: u128,
    reserve1: u128,
    last_sync_time: u64,
    cumulative: PriceCumulative,
}

impl ReserveState {
    #[must_use]
    pub fn reserves(&self) -> Reserves {
        Reserves {
            reserve0: self.reserve0,
            reserve1: self.reserve1,
            last_sync_time: self.last_sync_time,
        }
    }

    #[must_use]
    pub fn cumulative(&self) -> PriceCumulative {
        self.cumulative
    }

    /// Overwrite reserves with true balances observed at `now`.
    ///
    /// Accumulators advance only when time has passed and both previous
    /// reserves are non-zero. A clock reading earlier than the last sync
    /// counts as zero elapsed time and leaves `last_sync_time` where it was.
    ///
    /// # Errors
    /// `Overflow` if either balance exceeds `2^112 - 1`. State is untouched.
    pub fn update(&mut self, balance0: u128, balance1: u128, now: u64) -> Result<()> {
        if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
            return Err(PairswapError::overflow(format!(
                "reserves ({balance0}, {balance1}) exceed 112 bits"
            )));
        }
        let elapsed = now.saturating_sub(self.last_sync_time);
        if elapsed > 0 && self.reserve0 != 0 && self.reserve1 != 0 {
            let price0 = uq112x112::fraction(self.reserve1, self.reserve0)?;
            let price1 = uq112x112::fraction(self.reserve0, self.reserve1)?;
            self.cumulative.price0 = uq112x112::accumulate(self.cumulative.price0, price0, elapsed);
            self.cumulative.price1 = uq112x112::accumulate(self.cumulative.price1, price1, elapsed);
        }
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        self.last_sync_time = self.last_sync_time.max(now);
        Ok(())
    }
}
