//! The fee-adjusted constant-product gate.
//!
//! After a swap has paid out and collected its inputs, the pool accepts the
//! new balances only if
//!
//! ```text
//! (b0 * D - in0 * F) * (b1 * D - in1 * F) >= r0 * r1 * D^2
//! ```
//!
//! where `F / D` is the swap fee. Both sides are evaluated over 512 bits:
//! each factor is below `2^240` for 112-bit balances and any `u128` fee
//! denominator, so the products never wrap.

use pairswap_types::{FeeConfig, PairswapError, Result};
use primitive_types::{U256, U512};

/// Balances and flows observed at the end of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvariantInputs {
    /// True custodied balance after payout and repayment.
    pub balance0: u128,
    pub balance1: u128,
    /// Input credited to the pool, derived from the balance delta.
    pub amount0_in: u128,
    pub amount1_in: u128,
    /// Reserves recorded before the swap.
    pub reserve0: u128,
    pub reserve1: u128,
}

fn fee_adjusted(balance: u128, amount_in: u128, fee: &FeeConfig, side: &str) -> Result<U256> {
    let scaled = U256::from(balance) * U256::from(fee.denominator);
    let charged = U256::from(amount_in) * U256::from(fee.numerator);
    scaled
        .checked_sub(charged)
        .ok_or_else(|| PairswapError::underflow(format!("fee-adjusted balance{side}")))
}

/// Accept or reject a swap's post-state.
///
/// # Errors
/// - `InvariantViolation` if the fee-adjusted product would decrease
/// - `Configuration` if `fee` is not a valid fraction
pub fn check_invariant(inputs: &InvariantInputs, fee: &FeeConfig) -> Result<()> {
    fee.validate()?;
    let adjusted0 = fee_adjusted(inputs.balance0, inputs.amount0_in, fee, "0")?;
    let adjusted1 = fee_adjusted(inputs.balance1, inputs.amount1_in, fee, "1")?;
    let lhs: U512 = adjusted0.full_mul(adjusted1);

    let k = U256::from(inputs.reserve0) * U256::from(inputs.reserve1);
    let d = U256::from(fee.denominator);
    let rhs: U512 = k.full_mul(d * d);

    if lhs < rhs {
        return Err(PairswapError::InvariantViolation {
            reason: format!("fee-adjusted product {lhs} < {rhs}"),
        });
    }
    Ok(())
}
