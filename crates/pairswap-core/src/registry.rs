//! Pool registry.
//!
//! One pool per unordered asset pair. The registry owns its pools and the
//! shared clock, and carries the default configuration new pools start
//! from. Changing the protocol fee recipient here applies to every pool.

use std::collections::BTreeMap;
use std::sync::Arc;

use pairswap_types::{Address, AssetId, AssetPair, PairswapError, PoolConfig, PoolId, Result};

use crate::clock::Clock;
use crate::pool::Pool;

#[derive(Debug)]
pub struct PoolRegistry {
    pools: BTreeMap<PoolId, Pool>,
    default_config: PoolConfig,
    clock: Arc<dyn Clock>,
}

impl PoolRegistry {
    /// # Errors
    /// `Configuration` if `default_config` does not validate.
    pub fn new(default_config: PoolConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        default_config.validate()?;
        Ok(Self {
            pools: BTreeMap::new(),
            default_config,
            clock,
        })
    }

    #[must_use]
    pub fn default_config(&self) -> &PoolConfig {
        &self.default_config
    }

    /// Create the pool for `(a, b)` in either order.
    ///
    /// # Errors
    /// - `IdenticalAssets` if `a == b`
    /// - `InvalidAsset` if either is the zero asset
    /// - `PoolExists` if the pair already has a pool
    pub fn create_pool(&mut self, a: AssetId, b: AssetId) -> Result<PoolId> {
        let pair = AssetPair::new(a, b)?;
        let id = PoolId::for_pair(&pair);
        if self.pools.contains_key(&id) {
            return Err(PairswapError::PoolExists(id));
        }
        let pool = Pool::new(pair, self.default_config, Arc::clone(&self.clock))?;
        self.pools.insert(id, pool);
        tracing::info!(pool = %id, pair = %pair, total_pools = self.pools.len(), "Pool created");
        Ok(id)
    }

    /// Look up the pool for `(a, b)` in either order.
    ///
    /// # Errors
    /// `PoolNotFound` if no pool exists for the pair.
    pub fn pool_id(&self, a: AssetId, b: AssetId) -> Result<PoolId> {
        let id = PoolId::for_pair(&AssetPair::new(a, b)?);
        if self.pools.contains_key(&id) {
            Ok(id)
        } else {
            Err(PairswapError::PoolNotFound(id))
        }
    }

    pub fn pool(&self, id: &PoolId) -> Result<&Pool> {
        self.pools.get(id).ok_or(PairswapError::PoolNotFound(*id))
    }

    pub fn pool_mut(&mut self, id: &PoolId) -> Result<&mut Pool> {
        self.pools.get_mut(id).ok_or(PairswapError::PoolNotFound(*id))
    }

    /// Ids of every pool, in id order.
    pub fn all_pools(&self) -> impl Iterator<Item = &PoolId> {
        self.pools.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Point the protocol fee of every pool, and of pools created later, at
    /// `recipient`. `None` switches it off. Each pool keeps its own share.
    ///
    /// # Errors
    /// `Configuration` if `recipient` is the zero address.
    pub fn set_fee_recipient(&mut self, recipient: Option<Address>) -> Result<()> {
        let mut default_fee = self.default_config.protocol_fee;
        default_fee.recipient = recipient;
        default_fee.validate()?;
        for pool in self.pools.values_mut() {
            let mut fee = *pool.protocol_fee();
            fee.recipient = recipient;
            pool.set_protocol_fee(fee)?;
        }
        self.default_config.protocol_fee = default_fee;
        tracing::info!(
            enabled = recipient.is_some(),
            pools = self.pools.len(),
            "Fee recipient updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn registry() -> PoolRegistry {
        PoolRegistry::new(PoolConfig::default(), Arc::new(ManualClock::new(0))).unwrap()
    }

    #[test]
    fn create_and_find_in_either_order() {
        let mut reg = registry();
        let a = AssetId::from_label("A");
        let b = AssetId::from_label("B");
        let id = reg.create_pool(a, b).unwrap();
        assert_eq!(reg.pool_id(b, a).unwrap(), id);
        assert_eq!(reg.pool(&id).unwrap().pair(), AssetPair::new(b, a).unwrap());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_pair_rejected() {
        let mut reg = registry();
        let a = AssetId::from_label("A");
        let b = AssetId::from_label("B");
        let id = reg.create_pool(a, b).unwrap();
        assert_eq!(reg.create_pool(b, a), Err(PairswapError::PoolExists(id)));
    }

    #[test]
    fn invalid_pairs_rejected() {
        let mut reg = registry();
        let a = AssetId::from_label("A");
        assert_eq!(reg.create_pool(a, a), Err(PairswapError::IdenticalAssets(a)));
        assert!(matches!(
            reg.create_pool(a, AssetId::new(Address::ZERO)),
            Err(PairswapError::InvalidAsset { .. })
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn missing_pool_reported() {
        let reg = registry();
        let err = reg
            .pool_id(AssetId::from_label("A"), AssetId::from_label("B"))
            .unwrap_err();
        assert!(matches!(err, PairswapError::PoolNotFound(_)));
    }

    #[test]
    fn fee_recipient_reaches_existing_and_new_pools() {
        let mut reg = registry();
        let a = AssetId::from_label("A");
        let b = AssetId::from_label("B");
        let c = AssetId::from_label("C");
        let first = reg.create_pool(a, b).unwrap();
        let treasury = Address::from_label("treasury");
        reg.set_fee_recipient(Some(treasury)).unwrap();
        let second = reg.create_pool(a, c).unwrap();
        for id in [first, second] {
            assert_eq!(reg.pool(&id).unwrap().protocol_fee().recipient, Some(treasury));
        }
        assert!(reg.set_fee_recipient(Some(Address::ZERO)).is_err());
        reg.set_fee_recipient(None).unwrap();
        assert!(!reg.pool(&first).unwrap().protocol_fee().is_enabled());
        assert_eq!(reg.all_pools().count(), 2);
    }
}
