//! # pairswap-math
//!
//! Exact integer math for the PairSwap pool engine. Nothing here touches
//! state; every function is a pure computation over `u128` amounts with
//! 256/512-bit intermediates so products of two reserves never overflow.
//!
//! - [`isqrt`] / [`sqrt_product`]: floor square root (share issuance, `sqrt(k)`)
//! - [`mul_div`] / [`mul_div_wide`]: `floor(a * b / d)` without intermediate overflow
//! - [`uq112x112`]: price encoding for the cumulative price accumulator
//! - [`check_invariant`]: the fee-adjusted constant-product gate
//! - [`amount_out`] / [`amount_in`] / [`quote`]: constant-product quoting
//! - [`protocol_fee_shares`]: shares owed to the protocol for sqrt(k) growth

pub mod invariant;
pub mod mul_div;
pub mod protocol_fee;
pub mod quote;
pub mod sqrt;
pub mod uq112x112;

pub use invariant::{check_invariant, InvariantInputs};
pub use mul_div::{mul_div, mul_div_wide};
pub use protocol_fee::protocol_fee_shares;
pub use quote::{amount_in, amount_out, quote};
pub use sqrt::{isqrt, sqrt_product};

pub use primitive_types::{U256, U512};

use pairswap_types::{PairswapError, Result};

/// Narrow a 256-bit value to `u128`, failing `Overflow` if it does not fit.
pub fn to_u128(value: U256, context: &str) -> Result<u128> {
    if value.bits() > 128 {
        return Err(PairswapError::overflow(format!(
            "{context}: {value} exceeds 128 bits"
        )));
    }
    Ok(value.low_u128())
}

/// Narrow a 512-bit value to `u128`.
pub(crate) fn wide_to_u128(value: U512, context: &str) -> Result<u128> {
    let narrowed = U256::try_from(value)
        .map_err(|_| PairswapError::overflow(format!("{context}: exceeds 256 bits")))?;
    to_u128(narrowed, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_u128_boundary() {
        assert_eq!(to_u128(U256::from(u128::MAX), "max").unwrap(), u128::MAX);
        let err = to_u128(U256::from(u128::MAX) + U256::one(), "max+1").unwrap_err();
        assert!(matches!(err, PairswapError::Overflow { .. }));
    }

    #[test]
    fn wide_to_u128_rejects_large() {
        let big = U512::from(U256::MAX);
        assert!(wide_to_u128(big, "big").is_err());
        assert_eq!(wide_to_u128(U512::from(42u64), "small").unwrap(), 42);
    }
}
