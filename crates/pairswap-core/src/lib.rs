//! # pairswap-core
//!
//! Constant-product pool engine for **PairSwap**.
//!
//! - [`Pool`]: reserves, liquidity shares, swaps and flash swaps for one pair
//! - native-asset pools: [`Pool::provide_liquidity_native`] and the
//!   `swap_exact_*_native*` entry points wrap and unwrap around a trade
//! - [`PoolRegistry`]: one pool per unordered pair, shared protocol fee switch
//! - [`ShareLedger`]: fungible liquidity shares with allowances
//! - [`ReserveState`]: reserves plus the UQ112x112 cumulative price oracle
//! - [`Clock`]: injected time source ([`SystemClock`], [`ManualClock`])
//!
//! ## Swap lifecycle
//!
//! ```text
//! PAYOUT ──▶ CALLBACK ──▶ RECONCILIATION ──▶ INVARIANT_CHECK ──▶ COMMIT
//!            (flash only)                          │
//!                                                  └─ fail: roll back all
//! ```
//!
//! Assets move on external [`pairswap_ledger::Ledgers`]; the pool reads its
//! true custodied balances and trusts nothing else. Any failed call leaves
//! pool state, events and ledgers exactly as they were.

pub mod clock;
pub mod events;
pub mod exact;
pub mod flash;
pub mod native;
pub mod pool;
pub mod protocol_fee;
pub mod registry;
pub mod reserves;
pub mod shares;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::EventLog;
pub use exact::LiquidityReceipt;
pub use flash::{FlashCallback, FlashSwap, FlashSwapCallee};
pub use pool::{Pool, SwapReceipt, SwapRequest};
pub use protocol_fee::ProtocolFeeAccrual;
pub use registry::PoolRegistry;
pub use reserves::{PriceCumulative, ReserveState, Reserves};
pub use shares::ShareLedger;
