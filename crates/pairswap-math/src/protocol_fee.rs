//! Protocol fee share issuance.
//!
//! Between two liquidity events, swap fees grow `sqrt(k)`. The protocol
//! recipient is owed fraction `n / d` of that growth. Minting
//!
//! ```text
//! S * n * (sqrt(k) - sqrt(k_last)) / ((d - n) * sqrt(k) + n * sqrt(k_last))
//! ```
//!
//! new shares dilutes existing holders by exactly that fraction. With
//! `n / d = 1 / 6` this reduces to `S * (rk - rkl) / (5 * rk + rkl)`.

use pairswap_types::{ProtocolFeeShare, Result};
use primitive_types::{U256, U512};

use crate::wide_to_u128;

/// Shares to mint to the protocol recipient. Zero when `root_k` has not
/// grown past `root_k_last`.
pub fn protocol_fee_shares(
    total_shares: u128,
    root_k: u128,
    root_k_last: u128,
    share: &ProtocolFeeShare,
) -> Result<u128> {
    share.validate()?;
    if root_k <= root_k_last || total_shares == 0 {
        return Ok(0);
    }
    let growth = U256::from(total_shares) * U256::from(root_k - root_k_last);
    let numerator: U512 = growth.full_mul(U256::from(share.numerator));

    let rest = U256::from(share.denominator - share.numerator).full_mul(U256::from(root_k));
    let last = U256::from(share.numerator).full_mul(U256::from(root_k_last));
    let denominator = rest + last;

    wide_to_u128(numerator / denominator, "protocol_fee_shares")
}
