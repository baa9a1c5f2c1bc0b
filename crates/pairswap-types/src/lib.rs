//! # pairswap-types
//!
//! Shared types, errors, and configuration for the **PairSwap** AMM engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetId`], [`AssetPair`], [`PoolId`]
//! - **Events**: [`PoolEvent`], [`EventKind`], [`EventRecord`]
//! - **Swap lifecycle**: [`SwapPhase`]
//! - **Configuration**: [`PoolConfig`], [`FeeConfig`], [`ProtocolFeeConfig`], [`ProtocolFeeShare`]
//! - **Errors**: [`PairswapError`] with `PS_ERR_` prefix codes
//! - **Constants**: minimum liquidity, reserve width, fee defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod phase;

// Re-export all primary types at crate root for ergonomic imports:
//   use pairswap_types::{Address, AssetPair, PairswapError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use phase::*;

// Constants are accessed via `pairswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
