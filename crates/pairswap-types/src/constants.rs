//! System-wide constants for the PairSwap AMM engine.

/// Shares minted once, permanently, to the zero address on first provision.
pub const MINIMUM_LIQUIDITY: u128 = 1000;

/// Bit width reserves are bounded to.
pub const RESERVE_BITS: u32 = 112;

/// Largest representable reserve: `2^112 - 1`.
pub const MAX_RESERVE: u128 = (1u128 << RESERVE_BITS) - 1;

/// Default swap fee numerator (0.3%).
pub const DEFAULT_FEE_NUMERATOR: u128 = 3;

/// Default swap fee denominator.
pub const DEFAULT_FEE_DENOMINATOR: u128 = 1000;

/// Default protocol share of sqrt(k) growth: 1/6.
pub const DEFAULT_PROTOCOL_SHARE_NUMERATOR: u128 = 1;

/// Default protocol share denominator.
pub const DEFAULT_PROTOCOL_SHARE_DENOMINATOR: u128 = 6;

/// Basis-point scale used by fee-on-transfer ledgers.
pub const BPS_SCALE: u128 = 10_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "PairSwap";
