//! Integer square root.

use primitive_types::U256;

/// Largest `x` with `x * x <= y`.
///
/// Newton's method seeded at `2^ceil(bits(y) / 2)`, which is always at or
/// above the true root, so the iterates decrease monotonically and the loop
/// stops at the first non-decreasing step. Converges in O(log y) steps.
#[must_use]
pub fn isqrt(y: U256) -> U256 {
    if y.is_zero() {
        return U256::zero();
    }
    let mut x = U256::one() << y.bits().div_ceil(2);
    loop {
        let next = (x + y / x) >> 1;
        if next >= x {
            return x;
        }
        x = next;
    }
}

/// `isqrt(a * b)` over a 256-bit product. The root of a product of two
/// `u128` values always fits in `u128`.
#[must_use]
pub fn sqrt_product(a: u128, b: u128) -> u128 {
    isqrt(U256::from(a) * U256::from(b)).low_u128()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_values() {
        let expected = [0u64, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3];
        for (y, want) in expected.iter().enumerate() {
            assert_eq!(isqrt(U256::from(y)), U256::from(*want), "isqrt({y})");
        }
    }

    #[test]
    fn first_provision_root() {
        let e18 = 10u128.pow(18);
        assert_eq!(sqrt_product(100 * e18, 1000 * e18), 316_227_766_016_837_933_199);
    }

    #[test]
    fn full_width() {
        assert_eq!(isqrt(U256::MAX), U256::from(u128::MAX));
        assert_eq!(sqrt_product(u128::MAX, u128::MAX), u128::MAX);
    }

    #[test]
    fn perfect_squares() {
        for r in [1u128, 7, 1000, 1001, 1 << 64, (1 << 112) - 1] {
            assert_eq!(sqrt_product(r, r), r);
        }
    }

    proptest! {
        #[test]
        fn root_brackets_input(a in any::<u128>(), b in any::<u128>()) {
            let y = U256::from(a) * U256::from(b);
            let x = isqrt(y);
            prop_assert!(x * x <= y);
            let next = x + U256::one();
            // (x+1)^2 can exceed 256 bits only when y is near the top.
            if let Some(sq) = next.checked_mul(next) {
                prop_assert!(sq > y);
            }
        }
    }
}
