//! # pairswap-ledger
//!
//! The asset side of PairSwap. A pool never stores assets itself: it holds
//! balances under its custody address on each asset's own ledger, and
//! measures what it received by reading those balances back.
//!
//! - [`TokenLedger`]: the capability a pool needs from an asset ledger
//! - [`StandardToken`]: plain fungible asset with mint/burn and allowances
//! - [`FeeOnTransferToken`]: burns a basis-point fee on every transfer
//! - [`WrappedNativeToken`]: the native asset as a token, with
//!   deposit/withdraw against native balances
//! - [`Ledgers`]: the set of ledgers a call operates on, with
//!   snapshot/restore so a failed call leaves no trace
//! - [`SupplyConservation`]: minted-minus-burned bookkeeping per token

pub mod fee_on_transfer;
pub mod ledger;
pub mod ledgers;
pub mod standard;
pub mod supply;
pub mod wrapped_native;

pub use fee_on_transfer::FeeOnTransferToken;
pub use ledger::TokenLedger;
pub use ledgers::{LedgerSnapshot, Ledgers};
pub use standard::StandardToken;
pub use supply::SupplyConservation;
pub use wrapped_native::WrappedNativeToken;
