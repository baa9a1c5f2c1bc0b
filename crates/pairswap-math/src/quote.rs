//! Constant-product quoting.
//!
//! These are the closed forms of the invariant gate: [`amount_out`] is the
//! largest output the gate accepts for a given input, and [`amount_in`] the
//! smallest input that pays for a given output.

use pairswap_types::{FeeConfig, PairswapError, Result};
use primitive_types::{U256, U512};

use crate::{mul_div, wide_to_u128};

fn require_reserves(reserve_in: u128, reserve_out: u128) -> Result<()> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(PairswapError::InsufficientLiquidity);
    }
    Ok(())
}

/// Largest output obtainable for `amount_in` after the fee.
///
/// `out = in * (D - F) * r_out / (r_in * D + in * (D - F))`
pub fn amount_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: &FeeConfig,
) -> Result<u128> {
    if amount_in == 0 {
        return Err(PairswapError::InsufficientInputAmount);
    }
    require_reserves(reserve_in, reserve_out)?;
    fee.validate()?;

    let in_with_fee = U256::from(amount_in) * U256::from(fee.retained());
    let numerator = in_with_fee.full_mul(U256::from(reserve_out));
    let denominator = U512::from(U256::from(reserve_in) * U256::from(fee.denominator))
        + U512::from(in_with_fee);
    wide_to_u128(numerator / denominator, "amount_out")
}

/// Smallest input that pays for `amount_out` after the fee.
///
/// `in = floor(r_in * out * D / ((r_out - out) * (D - F))) + 1`
pub fn amount_in(
    amount_out: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: &FeeConfig,
) -> Result<u128> {
    if amount_out == 0 {
        return Err(PairswapError::InsufficientOutputAmount);
    }
    require_reserves(reserve_in, reserve_out)?;
    if amount_out >= reserve_out {
        return Err(PairswapError::InsufficientLiquidity);
    }
    fee.validate()?;

    let numerator = (U256::from(reserve_in) * U256::from(amount_out))
        .full_mul(U256::from(fee.denominator));
    let denominator = U256::from(reserve_out - amount_out) * U256::from(fee.retained());
    if denominator.is_zero() {
        return Err(PairswapError::DivisionByZero);
    }
    let floor = wide_to_u128(numerator / U512::from(denominator), "amount_in")?;
    floor
        .checked_add(1)
        .ok_or_else(|| PairswapError::overflow("amount_in"))
}

/// Amount of the other asset equal in value to `amount_a` at the current
/// reserve ratio (no fee).
pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128> {
    if amount_a == 0 {
        return Err(PairswapError::InsufficientInputAmount);
    }
    require_reserves(reserve_a, reserve_b)?;
    mul_div(amount_a, reserve_b, reserve_a)
}
