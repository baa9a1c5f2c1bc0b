//! `floor(a * b / denominator)` with a full-width intermediate.

use pairswap_types::{PairswapError, Result};
use primitive_types::{U256, U512};

use crate::to_u128;

/// `floor(a * b / denominator)` over a 256-bit product.
///
/// # Errors
/// - `DivisionByZero` if `denominator == 0`
/// - `Overflow` if the quotient does not fit in `u128`
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(PairswapError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    to_u128(product / U256::from(denominator), "mul_div")
}

/// `floor(a * b / denominator)` over a 512-bit product, for 256-bit operands.
pub fn mul_div_wide(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(PairswapError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| PairswapError::overflow("mul_div_wide"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_floored() {
        assert_eq!(mul_div(10, 20, 5).unwrap(), 40);
        assert_eq!(mul_div(10, 20, 3).unwrap(), 66);
        assert_eq!(mul_div(0, 20, 3).unwrap(), 0);
    }

    #[test]
    fn no_intermediate_overflow() {
        assert_eq!(mul_div(u128::MAX, u128::MAX, u128::MAX).unwrap(), u128::MAX);
        assert_eq!(mul_div(u128::MAX, 3, 4).unwrap(), u128::MAX / 4 * 3 + 2);
    }

    #[test]
    fn quotient_overflow_detected() {
        let err = mul_div(u128::MAX, 2, 1).unwrap_err();
        assert!(matches!(err, PairswapError::Overflow { .. }));
    }

    #[test]
    fn zero_denominator() {
        assert!(matches!(
            mul_div(1, 1, 0),
            Err(PairswapError::DivisionByZero)
        ));
        assert!(matches!(
            mul_div_wide(U256::one(), U256::one(), U256::zero()),
            Err(PairswapError::DivisionByZero)
        ));
    }

    #[test]
    fn wide_variant() {
        let got = mul_div_wide(U256::MAX, U256::MAX, U256::MAX).unwrap();
        assert_eq!(got, U256::MAX);
        assert!(mul_div_wide(U256::MAX, U256::from(2u8), U256::one()).is_err());
    }
}
