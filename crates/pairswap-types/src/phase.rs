//! Swap lifecycle phases.
//!
//! A swap moves through a fixed sequence. The pool logs each transition so
//! a rejected swap can be traced to the phase that refused it.

use serde::{Deserialize, Serialize};

/// The phase a swap is in.
///
/// ```text
/// Payout -> Callback -> Reconciliation -> InvariantCheck -> Commit
/// ```
///
/// `Callback` is skipped when no flash callee is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapPhase {
    /// Requested outputs are transferred to the recipient, unverified.
    Payout,
    /// The flash callee runs and may repay into the pool.
    Callback,
    /// Inputs are derived from true balances versus the pre-swap reserves.
    Reconciliation,
    /// The fee-adjusted constant-product gate.
    InvariantCheck,
    /// Reserves are synced and the swap event is recorded.
    Commit,
}

impl SwapPhase {
    /// The phase that follows this one, if any.
    #[must_use]
    pub fn next(self, has_callback: bool) -> Option<Self> {
        match self {
            Self::Payout if has_callback => Some(Self::Callback),
            Self::Payout | Self::Callback => Some(Self::Reconciliation),
            Self::Reconciliation => Some(Self::InvariantCheck),
            Self::InvariantCheck => Some(Self::Commit),
            Self::Commit => None,
        }
    }
}

impl std::fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payout => write!(f, "PAYOUT"),
            Self::Callback => write!(f, "CALLBACK"),
            Self::Reconciliation => write!(f, "RECONCILIATION"),
            Self::InvariantCheck => write!(f, "INVARIANT_CHECK"),
            Self::Commit => write!(f, "COMMIT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_sequence_with_callback() {
        let mut phase = SwapPhase::Payout;
        let mut seen = vec![phase];
        while let Some(next) = phase.next(true) {
            seen.push(next);
            phase = next;
        }
        assert_eq!(
            seen,
            vec![
                SwapPhase::Payout,
                SwapPhase::Callback,
                SwapPhase::Reconciliation,
                SwapPhase::InvariantCheck,
                SwapPhase::Commit,
            ]
        );
    }

    #[test]
    fn callback_skipped_without_callee() {
        assert_eq!(
            SwapPhase::Payout.next(false),
            Some(SwapPhase::Reconciliation)
        );
    }

    #[test]
    fn display() {
        assert_eq!(SwapPhase::InvariantCheck.to_string(), "INVARIANT_CHECK");
    }
}
