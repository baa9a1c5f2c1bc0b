#![allow(dead_code)]

use std::sync::Arc;

use pairswap_core::{ManualClock, Pool};
use pairswap_ledger::Ledgers;
use pairswap_types::{Address, AssetPair, PoolConfig};

pub const E18: u128 = 1_000_000_000_000_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Two standard assets, one pool over them, and a manual clock at t = 1000.
pub struct Fixture {
    pub pool: Pool,
    pub ledgers: Ledgers,
    pub clock: ManualClock,
    pub alice: Address,
    pub bob: Address,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        init_tracing();
        let (ledgers, assets) = Ledgers::with_standard_tokens(&["TKA", "TKB"]);
        let pair = AssetPair::new(assets[0], assets[1]).unwrap();
        let clock = ManualClock::new(1_000);
        let pool = Pool::new(pair, config, Arc::new(clock.clone())).unwrap();
        Self {
            pool,
            ledgers,
            clock,
            alice: Address::from_label("alice"),
            bob: Address::from_label("bob"),
        }
    }

    /// Mint straight into the pool's custody, as a depositor would.
    pub fn deposit(&mut self, amount0: u128, amount1: u128) {
        let custody = self.pool.custody();
        if amount0 > 0 {
            self.ledgers.mint(&self.pool.asset0(), &custody, amount0).unwrap();
        }
        if amount1 > 0 {
            self.ledgers.mint(&self.pool.asset1(), &custody, amount1).unwrap();
        }
    }

    /// Deposit and provision to alice.
    pub fn seed(&mut self, amount0: u128, amount1: u128) -> u128 {
        self.deposit(amount0, amount1);
        let alice = self.alice;
        self.pool.provision(&mut self.ledgers, &alice, &alice).unwrap()
    }

    pub fn balance0(&self, holder: &Address) -> u128 {
        self.ledgers.balance_of(&self.pool.asset0(), holder).unwrap()
    }

    pub fn balance1(&self, holder: &Address) -> u128 {
        self.ledgers.balance_of(&self.pool.asset1(), holder).unwrap()
    }
}
