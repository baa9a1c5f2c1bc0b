//! Error types for the PairSwap AMM engine.
//!
//! All errors use the `PS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by taxonomy:
//! - 1xx: Input validation errors
//! - 2xx: State invariant errors
//! - 3xx: External (asset ledger / callback) failures
//! - 4xx: Registry errors
//! - 9xx: General / internal errors
//!
//! Every error is terminal for the call that produced it: the pool engine
//! discards all effects of the call before surfacing the error.

use std::fmt;

use thiserror::Error;

use crate::{AssetId, PoolId};

/// Central error enum for all PairSwap operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairswapError {
    // =================================================================
    // Input Validation (1xx)
    // =================================================================
    /// A swap requested zero output on both sides, or produced less than
    /// the caller's minimum.
    #[error("PS_ERR_100: Insufficient output amount")]
    InsufficientOutputAmount,

    /// No input was received for a swap.
    #[error("PS_ERR_101: Insufficient input amount")]
    InsufficientInputAmount,

    /// Recipient is the zero address or one of the pool's asset ledgers.
    #[error("PS_ERR_102: Invalid recipient: {reason}")]
    InvalidRecipient { reason: String },

    /// Both sides of a pair are the same asset.
    #[error("PS_ERR_103: Identical assets: {0}")]
    IdenticalAssets(AssetId),

    /// The asset is the zero address or not part of the pool.
    #[error("PS_ERR_104: Invalid asset: {reason}")]
    InvalidAsset { reason: String },

    /// An exact-output swap needs more input than the caller allowed.
    #[error("PS_ERR_105: Excessive input amount: need {needed}, max {max}")]
    ExcessiveInputAmount { needed: u128, max: u128 },

    /// A native-asset entry point was called on a pool that does not hold
    /// the wrapped native asset.
    #[error("PS_ERR_106: Not a native-asset pool: {0}")]
    NotNativePool(PoolId),

    // =================================================================
    // State Invariant (2xx)
    // =================================================================
    /// The fee-adjusted reserve product would decrease.
    #[error("PS_ERR_200: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// A value exceeded its bounded width.
    #[error("PS_ERR_201: Overflow: {context}")]
    Overflow { context: String },

    /// A subtraction would go negative.
    #[error("PS_ERR_202: Underflow: {context}")]
    Underflow { context: String },

    /// Division by zero in fixed-point math.
    #[error("PS_ERR_203: Division by zero")]
    DivisionByZero,

    /// Holder does not own enough shares.
    #[error("PS_ERR_204: Insufficient shares: need {needed}, have {available}")]
    InsufficientShares { needed: u128, available: u128 },

    /// Requested output is not covered by the current reserves.
    #[error("PS_ERR_205: Insufficient liquidity")]
    InsufficientLiquidity,

    /// A provision would mint zero (or negative) shares.
    #[error("PS_ERR_206: Insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A removal would pay out zero of either asset.
    #[error("PS_ERR_207: Insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// The locked minimum-liquidity holder can never spend.
    #[error("PS_ERR_208: Shares held by the zero address are locked")]
    SharesLocked,

    /// Sum of holder balances no longer matches the recorded total.
    #[error("PS_ERR_209: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // External Failure (3xx)
    // =================================================================
    /// The asset ledger refused a transfer.
    #[error("PS_ERR_300: Transfer of {asset} failed: {reason}")]
    TransferFailed { asset: AssetId, reason: String },

    /// Holder balance on an asset ledger is too low.
    #[error("PS_ERR_301: Insufficient {asset} balance: need {needed}, have {available}")]
    InsufficientBalance {
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    /// Spender allowance on an asset ledger is too low.
    #[error("PS_ERR_302: Insufficient {asset} allowance: need {needed}, have {available}")]
    InsufficientAllowance {
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    /// No ledger is registered for this asset.
    #[error("PS_ERR_303: Unknown asset: {0}")]
    UnknownAsset(AssetId),

    /// The flash-swap callee reported a failure.
    #[error("PS_ERR_304: Flash callback failed: {reason}")]
    CallbackFailed { reason: String },

    // =================================================================
    // Registry (4xx)
    // =================================================================
    /// A pool for this pair already exists.
    #[error("PS_ERR_400: Pool already exists: {0}")]
    PoolExists(PoolId),

    /// No pool is registered under this id or pair.
    #[error("PS_ERR_401: Pool not found: {0}")]
    PoolNotFound(PoolId),

    /// A ledger for this asset is already registered.
    #[error("PS_ERR_402: Asset already registered: {0}")]
    AssetAlreadyRegistered(AssetId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid fee fraction, malformed file, etc.).
    #[error("PS_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("PS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Unrecoverable internal error.
    #[error("PS_ERR_902: Internal error: {0}")]
    Internal(String),
}

/// Error taxonomy: which part of the system rejected the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputValidation,
    StateInvariant,
    ExternalFailure,
    Registry,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputValidation => write!(f, "INPUT_VALIDATION"),
            Self::StateInvariant => write!(f, "STATE_INVARIANT"),
            Self::ExternalFailure => write!(f, "EXTERNAL_FAILURE"),
            Self::Registry => write!(f, "REGISTRY"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl PairswapError {
    /// Shorthand for [`PairswapError::Overflow`].
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }

    /// Shorthand for [`PairswapError::Underflow`].
    pub fn underflow(context: impl Into<String>) -> Self {
        Self::Underflow {
            context: context.into(),
        }
    }

    /// Shorthand for [`PairswapError::InvalidRecipient`].
    pub fn invalid_recipient(reason: impl Into<String>) -> Self {
        Self::InvalidRecipient {
            reason: reason.into(),
        }
    }

    /// Which taxonomy bucket this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientOutputAmount
            | Self::InsufficientInputAmount
            | Self::InvalidRecipient { .. }
            | Self::IdenticalAssets(_)
            | Self::InvalidAsset { .. }
            | Self::ExcessiveInputAmount { .. }
            | Self::NotNativePool(_) => ErrorCategory::InputValidation,
            Self::InvariantViolation { .. }
            | Self::Overflow { .. }
            | Self::Underflow { .. }
            | Self::DivisionByZero
            | Self::InsufficientShares { .. }
            | Self::InsufficientLiquidity
            | Self::InsufficientLiquidityMinted
            | Self::InsufficientLiquidityBurned
            | Self::SharesLocked
            | Self::SupplyInvariantViolation { .. } => ErrorCategory::StateInvariant,
            Self::TransferFailed { .. }
            | Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::UnknownAsset(_)
            | Self::CallbackFailed { .. } => ErrorCategory::ExternalFailure,
            Self::PoolExists(_) | Self::PoolNotFound(_) | Self::AssetAlreadyRegistered(_) => {
                ErrorCategory::Registry
            }
            Self::Configuration(_) | Self::Serialization(_) | Self::Internal(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PairswapError>;

impl From<serde_json::Error> for PairswapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
