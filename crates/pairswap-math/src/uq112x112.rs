//! UQ112x112 unsigned fixed point: 112 integer bits, 112 fractional bits.
//!
//! Used only for the cumulative price accumulator. A price `r1 / r0` of
//! two 112-bit reserves always fits in 224 bits.

use pairswap_types::constants::{MAX_RESERVE, RESERVE_BITS};
use pairswap_types::{PairswapError, Result};
use primitive_types::U256;

/// `2^112`, the fixed-point unit.
#[must_use]
pub fn q112() -> U256 {
    U256::one() << RESERVE_BITS
}

/// Encode a 112-bit integer as UQ112x112.
pub fn encode(y: u128) -> Result<U256> {
    if y > MAX_RESERVE {
        return Err(PairswapError::overflow(format!(
            "uq112x112 encode: {y} exceeds 112 bits"
        )));
    }
    Ok(U256::from(y) << RESERVE_BITS)
}

/// `numerator / denominator` as UQ112x112 (floored).
pub fn fraction(numerator: u128, denominator: u128) -> Result<U256> {
    if denominator == 0 {
        return Err(PairswapError::DivisionByZero);
    }
    Ok(encode(numerator)? / U256::from(denominator))
}

/// Add `price * elapsed` to an accumulator, modulo 2^256.
///
/// Wrapping is intended: consumers only ever look at the difference of two
/// readings, which stays correct across a wrap.
#[must_use]
pub fn accumulate(cumulative: U256, price: U256, elapsed: u64) -> U256 {
    let (increment, _) = price.overflowing_mul(U256::from(elapsed));
    let (sum, _) = cumulative.overflowing_add(increment);
    sum
}
