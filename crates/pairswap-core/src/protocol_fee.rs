//! Protocol fee accrual.
//!
//! Runs at the start of every provision and removal, never during a swap.
//! The fee is collected lazily: swap fees grow `k`, and the next liquidity
//! event mints the protocol's fraction of the `sqrt(k)` growth since
//! `k_last` as new shares.

use pairswap_math::{isqrt, protocol_fee_shares, sqrt_product, to_u128};
use pairswap_types::{Address, ProtocolFeeConfig, Result};
use primitive_types::U256;

use crate::reserves::Reserves;
use crate::shares::ShareLedger;

/// Outcome of an accrual step while the fee is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolFeeAccrual {
    pub recipient: Address,
    /// Shares minted to the recipient (may be zero).
    pub minted: u128,
}

/// `reserve0 * reserve1` as recorded in `k_last`.
#[must_use]
pub fn product(reserves: &Reserves) -> U256 {
    U256::from(reserves.reserve0) * U256::from(reserves.reserve1)
}

/// Mint the protocol's share of growth since `k_last`.
///
/// Returns `None` when the fee is off. Switching the fee off also clears
/// `k_last`, so turning it back on later never charges for the gap.
pub fn accrue(
    config: &ProtocolFeeConfig,
    k_last: &mut U256,
    reserves: &Reserves,
    shares: &mut ShareLedger,
) -> Result<Option<ProtocolFeeAccrual>> {
    let Some(recipient) = config.recipient else {
        *k_last = U256::zero();
        return Ok(None);
    };
    if k_last.is_zero() {
        return Ok(Some(ProtocolFeeAccrual {
            recipient,
            minted: 0,
        }));
    }

    let root_k = sqrt_product(reserves.reserve0, reserves.reserve1);
    let root_k_last = to_u128(isqrt(*k_last), "sqrt(k_last)")?;
    let minted = protocol_fee_shares(shares.total_supply(), root_k, root_k_last, &config.share)?;
    if minted > 0 {
        shares.mint(&recipient, minted)?;
    }
    Ok(Some(ProtocolFeeAccrual { recipient, minted }))
}
