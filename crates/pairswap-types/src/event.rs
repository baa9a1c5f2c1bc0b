//! Pool events.
//!
//! Every state change a pool commits is recorded as an [`EventRecord`].
//! Events are an outbound notification stream only; nothing inside the
//! engine reads them back. Events emitted by a call that later fails are
//! discarded together with the rest of its effects.

use serde::{Deserialize, Serialize};

use crate::{Address, PoolId};

/// The kind of event, for filtering and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Provision,
    Removal,
    Swap,
    Sync,
    SharesMinted,
    SharesBurned,
    SharesTransferred,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provision => write!(f, "PROVISION"),
            Self::Removal => write!(f, "REMOVAL"),
            Self::Swap => write!(f, "SWAP"),
            Self::Sync => write!(f, "SYNC"),
            Self::SharesMinted => write!(f, "SHARES_MINTED"),
            Self::SharesBurned => write!(f, "SHARES_BURNED"),
            Self::SharesTransferred => write!(f, "SHARES_TRANSFERRED"),
        }
    }
}

/// Payload of a pool event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// Liquidity was added and shares minted to `to`.
    Provision {
        sender: Address,
        to: Address,
        amount0: u128,
        amount1: u128,
        shares: u128,
    },
    /// Shares were burned and the underlying assets paid to `to`.
    Removal {
        sender: Address,
        to: Address,
        amount0: u128,
        amount1: u128,
        shares: u128,
    },
    Swap {
        sender: Address,
        amount0_in: u128,
        amount1_in: u128,
        amount0_out: u128,
        amount1_out: u128,
        to: Address,
    },
    /// Reserves were overwritten with the custodied balances.
    Sync { reserve0: u128, reserve1: u128 },
    SharesMinted { to: Address, amount: u128 },
    SharesBurned { from: Address, amount: u128 },
    SharesTransferred {
        from: Address,
        to: Address,
        amount: u128,
    },
}

impl PoolEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Provision { .. } => EventKind::Provision,
            Self::Removal { .. } => EventKind::Removal,
            Self::Swap { .. } => EventKind::Swap,
            Self::Sync { .. } => EventKind::Sync,
            Self::SharesMinted { .. } => EventKind::SharesMinted,
            Self::SharesBurned { .. } => EventKind::SharesBurned,
            Self::SharesTransferred { .. } => EventKind::SharesTransferred,
        }
    }
}

/// A pool event stamped with its origin and order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub pool: PoolId,
    /// Monotonic per-pool sequence number, starting at 0.
    pub sequence: u64,
    /// Clock reading (unix seconds) when the event was recorded.
    pub timestamp: u64,
    pub event: PoolEvent,
}

impl EventRecord {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}
