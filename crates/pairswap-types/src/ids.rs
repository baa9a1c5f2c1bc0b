//! Identifiers used throughout PairSwap.
//!
//! Holders, asset ledgers and pools all live in one 32-byte address space.
//! Pool identifiers are derived deterministically from the canonical asset
//! pair, so every party computes the same [`PoolId`] for the same two assets.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{PairswapError, Result};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte account address on an asset ledger.
///
/// [`Address::ZERO`] is the unspendable holder: it receives the locked
/// minimum liquidity and is never accepted as a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The unspendable zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Deterministic address derived from a human-readable label.
    ///
    /// `SHA-256("pairswap:address:v1:" || label)`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"pairswap:address:v1:");
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// First four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// A random non-zero address.
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes[0] |= 1;
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Identifies an exchangeable asset by the address of its own ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub Address);

impl AssetId {
    #[must_use]
    pub fn new(ledger: Address) -> Self {
        Self(ledger)
    }

    /// Deterministic asset id from a ticker-like label (e.g. `"USDC"`).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self(Address::from_label(label))
    }

    /// The asset ledger's own address.
    #[must_use]
    pub fn ledger_address(&self) -> Address {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{}", self.0.short())
    }
}

// ---------------------------------------------------------------------------
// AssetPair
// ---------------------------------------------------------------------------

/// Two distinct assets in canonical (ascending) order.
///
/// Construction sorts the inputs, so `AssetPair::new(a, b)` and
/// `AssetPair::new(b, a)` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetPair {
    asset0: AssetId,
    asset1: AssetId,
}

impl AssetPair {
    /// # Errors
    /// - `IdenticalAssets` if `a == b`
    /// - `InvalidAsset` if either asset is the zero address
    pub fn new(a: AssetId, b: AssetId) -> Result<Self> {
        if a == b {
            return Err(PairswapError::IdenticalAssets(a));
        }
        if a.is_zero() || b.is_zero() {
            return Err(PairswapError::InvalidAsset {
                reason: "zero asset address".to_string(),
            });
        }
        let (asset0, asset1) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { asset0, asset1 })
    }

    #[must_use]
    pub fn asset0(&self) -> AssetId {
        self.asset0
    }

    #[must_use]
    pub fn asset1(&self) -> AssetId {
        self.asset1
    }

    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.asset0 == *asset || self.asset1 == *asset
    }

    /// Index (0 or 1) of `asset` within the pair.
    #[must_use]
    pub fn index_of(&self, asset: &AssetId) -> Option<usize> {
        if self.asset0 == *asset {
            Some(0)
        } else if self.asset1 == *asset {
            Some(1)
        } else {
            None
        }
    }

    /// Whether `address` is one of the two asset ledgers.
    #[must_use]
    pub fn is_ledger_address(&self, address: &Address) -> bool {
        self.asset0.ledger_address() == *address || self.asset1.ledger_address() == *address
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset0, self.asset1)
    }
}

// ---------------------------------------------------------------------------
// PoolId
// ---------------------------------------------------------------------------

/// Deterministic pool identifier, one per unordered asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PoolId(pub [u8; 32]);

impl PoolId {
    /// `SHA-256("pairswap:pool:v1:" || asset0 || asset1)` over the canonical pair.
    #[must_use]
    pub fn for_pair(pair: &AssetPair) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"pairswap:pool:v1:");
        hasher.update(pair.asset0().0.as_bytes());
        hasher.update(pair.asset1().0.as_bytes());
        Self(hasher.finalize().into())
    }

    /// The pool's custody address on both asset ledgers.
    #[must_use]
    pub fn address(&self) -> Address {
        Address(self.0)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_canonical_regardless_of_order() {
        let a = AssetId::from_label("USDC");
        let b = AssetId::from_label("WETH");
        let ab = AssetPair::new(a, b).unwrap();
        let ba = AssetPair::new(b, a).unwrap();
        assert_eq!(ab, ba);
        assert!(ab.asset0() < ab.asset1());
    }

    #[test]
    fn identical_assets_rejected() {
        let a = AssetId::from_label("USDC");
        let err = AssetPair::new(a, a).unwrap_err();
        assert!(matches!(err, PairswapError::IdenticalAssets(id) if id == a));
    }

    #[test]
    fn zero_asset_rejected() {
        let a = AssetId::from_label("USDC");
        let err = AssetPair::new(a, AssetId::new(Address::ZERO)).unwrap_err();
        assert!(matches!(err, PairswapError::InvalidAsset { .. }));
    }

    #[test]
    fn pool_id_deterministic() {
        let a = AssetId::from_label("USDC");
        let b = AssetId::from_label("WETH");
        let p1 = PoolId::for_pair(&AssetPair::new(a, b).unwrap());
        let p2 = PoolId::for_pair(&AssetPair::new(b, a).unwrap());
        assert_eq!(p1, p2);
        let c = AssetId::from_label("DAI");
        let p3 = PoolId::for_pair(&AssetPair::new(a, c).unwrap());
        assert_ne!(p1, p3);
    }

    #[test]
    fn index_of_and_ledger_address() {
        let pair = AssetPair::new(AssetId::from_label("A"), AssetId::from_label("B")).unwrap();
        assert_eq!(pair.index_of(&pair.asset0()), Some(0));
        assert_eq!(pair.index_of(&pair.asset1()), Some(1));
        assert_eq!(pair.index_of(&AssetId::from_label("C")), None);
        assert!(pair.is_ledger_address(&pair.asset1().ledger_address()));
        assert!(!pair.is_ledger_address(&Address::from_label("alice")));
    }

    #[test]
    fn random_address_is_non_zero() {
        assert!(!Address::random().is_zero());
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn serde_roundtrips() {
        let addr = Address::from_label("alice");
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);

        let pair = AssetPair::new(AssetId::from_label("A"), AssetId::from_label("B")).unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        let back: AssetPair = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, back);
    }
}
