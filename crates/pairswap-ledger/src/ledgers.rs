//! The set of asset ledgers a call operates on.
//!
//! Pool operations take `&mut Ledgers`. Before a mutating call the pool
//! takes a [`LedgerSnapshot`]; on failure it restores it, so payouts made
//! before verification and deposits made by a flash callee disappear along
//! with the rest of the call.
//!
//! A snapshot covers either the whole set or just the ledgers a call can
//! reach. A pool's own operations only touch its two assets; a flash callee
//! may touch anything.

use std::collections::BTreeMap;

use pairswap_types::{Address, AssetId, PairswapError, Result};

use crate::{StandardToken, TokenLedger, WrappedNativeToken};

/// Asset ledgers keyed by [`AssetId`].
#[derive(Debug, Clone, Default)]
pub struct Ledgers {
    ledgers: BTreeMap<AssetId, Box<dyn TokenLedger>>,
    native: Option<AssetId>,
}

/// Opaque copy of ledger state, restorable with [`Ledgers::restore`].
#[derive(Debug, Clone)]
pub struct LedgerSnapshot(Saved);

#[derive(Debug, Clone)]
enum Saved {
    All(Ledgers),
    Assets(Vec<Box<dyn TokenLedger>>),
}

impl LedgerSnapshot {
    /// Number of asset ledgers copied.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.0 {
            Saved::All(ledgers) => ledgers.len(),
            Saved::Assets(saved) => saved.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Ledgers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger set with one empty [`StandardToken`] per label, returning the
    /// asset ids in label order.
    #[must_use]
    pub fn with_standard_tokens(labels: &[&str]) -> (Self, Vec<AssetId>) {
        let mut ledgers = Self::new();
        let mut assets = Vec::with_capacity(labels.len());
        for label in labels {
            let token = StandardToken::labeled(label);
            assets.push(token.asset());
            ledgers.ledgers.insert(token.asset(), Box::new(token));
        }
        (ledgers, assets)
    }

    /// # Errors
    /// `AssetAlreadyRegistered` if a ledger for the same asset exists.
    pub fn register<L: TokenLedger + 'static>(&mut self, ledger: L) -> Result<AssetId> {
        let asset = ledger.asset();
        if asset.is_zero() {
            return Err(PairswapError::InvalidAsset {
                reason: "ledger registered at the zero address".into(),
            });
        }
        if self.ledgers.contains_key(&asset) {
            return Err(PairswapError::AssetAlreadyRegistered(asset));
        }
        self.ledgers.insert(asset, Box::new(ledger));
        tracing::debug!(asset = %asset, "asset ledger registered");
        Ok(asset)
    }

    /// Register the wrapped native asset. At most one per set.
    ///
    /// # Errors
    /// `Configuration` if a native asset is already registered, plus the
    /// errors of [`Ledgers::register`].
    pub fn register_native(&mut self, token: WrappedNativeToken) -> Result<AssetId> {
        if let Some(existing) = self.native {
            return Err(PairswapError::Configuration(format!(
                "native asset already registered as {existing}"
            )));
        }
        let asset = self.register(token)?;
        self.native = Some(asset);
        Ok(asset)
    }

    /// The wrapped native asset, if one is registered.
    #[must_use]
    pub fn native_asset(&self) -> Option<AssetId> {
        self.native
    }

    fn native(&self) -> Result<&WrappedNativeToken> {
        let asset = self.native_asset().ok_or_else(no_native)?;
        self.get(&asset)?.as_wrapped_native().ok_or_else(no_native)
    }

    fn native_mut(&mut self) -> Result<&mut WrappedNativeToken> {
        let asset = self.native_asset().ok_or_else(no_native)?;
        self.get_mut(&asset)?
            .as_wrapped_native_mut()
            .ok_or_else(no_native)
    }

    pub fn native_balance_of(&self, holder: &Address) -> Result<u128> {
        Ok(self.native()?.native_balance_of(holder))
    }

    pub fn fund_native(&mut self, holder: &Address, amount: u128) -> Result<()> {
        self.native_mut()?.fund_native(holder, amount)
    }

    /// Wrap `from`'s native units into the native asset, credited to `to`.
    pub fn wrap_native(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.native_mut()?.deposit(from, to, amount)
    }

    /// Unwrap `from`'s native asset balance, releasing native units to `to`.
    pub fn unwrap_native(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        self.native_mut()?.withdraw(from, to, amount)
    }

    pub fn get(&self, asset: &AssetId) -> Result<&dyn TokenLedger> {
        self.ledgers
            .get(asset)
            .map(|ledger| &**ledger)
            .ok_or(PairswapError::UnknownAsset(*asset))
    }

    pub fn get_mut(&mut self, asset: &AssetId) -> Result<&mut (dyn TokenLedger + 'static)> {
        self.ledgers
            .get_mut(asset)
            .map(|ledger| &mut **ledger)
            .ok_or(PairswapError::UnknownAsset(*asset))
    }

    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.ledgers.contains_key(asset)
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetId> {
        self.ledgers.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    // =================================================================
    // Forwarding operations
    // =================================================================

    pub fn balance_of(&self, asset: &AssetId, holder: &Address) -> Result<u128> {
        Ok(self.get(asset)?.balance_of(holder))
    }

    pub fn total_supply(&self, asset: &AssetId) -> Result<u128> {
        Ok(self.get(asset)?.total_supply())
    }

    pub fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.get_mut(asset)?.transfer(from, to, amount)
    }

    pub fn approve(
        &mut self,
        asset: &AssetId,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<()> {
        self.get_mut(asset)?.approve(owner, spender, amount)
    }

    pub fn allowance(&self, asset: &AssetId, owner: &Address, spender: &Address) -> Result<u128> {
        Ok(self.get(asset)?.allowance(owner, spender))
    }

    pub fn transfer_from(
        &mut self,
        asset: &AssetId,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.get_mut(asset)?.transfer_from(spender, from, to, amount)
    }

    pub fn mint(&mut self, asset: &AssetId, to: &Address, amount: u128) -> Result<()> {
        self.get_mut(asset)?.mint(to, amount)
    }

    // =================================================================
    // Snapshot / restore
    // =================================================================

    /// Copy every ledger's state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot(Saved::All(self.clone()))
    }

    /// Copy only the listed ledgers. Unregistered assets are skipped: a
    /// call cannot change a ledger that does not exist.
    #[must_use]
    pub fn snapshot_assets(&self, assets: &[AssetId]) -> LedgerSnapshot {
        let saved = assets
            .iter()
            .filter_map(|asset| self.ledgers.get(asset).cloned())
            .collect();
        LedgerSnapshot(Saved::Assets(saved))
    }

    /// Put back the state captured by a snapshot. A full snapshot replaces
    /// the whole set; a partial one only the ledgers it copied.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        match snapshot.0 {
            Saved::All(ledgers) => *self = ledgers,
            Saved::Assets(saved) => {
                for ledger in saved {
                    self.ledgers.insert(ledger.asset(), ledger);
                }
            }
        }
    }
}

fn no_native() -> PairswapError {
    PairswapError::Configuration("no native asset registered".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeeOnTransferToken;

    #[test]
    fn register_and_forward() {
        let mut ledgers = Ledgers::new();
        let usdc = ledgers.register(StandardToken::labeled("USDC")).unwrap();
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");

        ledgers.mint(&usdc, &alice, 500).unwrap();
        ledgers.transfer(&usdc, &alice, &bob, 200).unwrap();
        assert_eq!(ledgers.balance_of(&usdc, &alice).unwrap(), 300);
        assert_eq!(ledgers.balance_of(&usdc, &bob).unwrap(), 200);
        assert_eq!(ledgers.total_supply(&usdc).unwrap(), 500);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut ledgers = Ledgers::new();
        ledgers.register(StandardToken::labeled("USDC")).unwrap();
        let err = ledgers.register(StandardToken::labeled("USDC")).unwrap_err();
        assert!(matches!(err, PairswapError::AssetAlreadyRegistered(_)));
    }

    #[test]
    fn unknown_asset() {
        let ledgers = Ledgers::new();
        let err = ledgers
            .balance_of(&AssetId::from_label("NOPE"), &Address::ZERO)
            .unwrap_err();
        assert!(matches!(err, PairswapError::UnknownAsset(_)));
    }

    #[test]
    fn snapshot_restore_reverts_all_ledgers() {
        let (mut ledgers, assets) = Ledgers::with_standard_tokens(&["A", "B"]);
        let alice = Address::from_label("alice");
        let pool = Address::from_label("pool");
        ledgers.mint(&assets[0], &alice, 100).unwrap();
        ledgers.mint(&assets[1], &alice, 100).unwrap();

        let snap = ledgers.snapshot();
        ledgers.transfer(&assets[0], &alice, &pool, 60).unwrap();
        ledgers.approve(&assets[1], &alice, &pool, 10).unwrap();
        ledgers.restore(snap);

        assert_eq!(ledgers.balance_of(&assets[0], &alice).unwrap(), 100);
        assert_eq!(ledgers.balance_of(&assets[0], &pool).unwrap(), 0);
        assert_eq!(ledgers.allowance(&assets[1], &alice, &pool).unwrap(), 0);
    }

    #[test]
    fn partial_snapshot_restores_only_listed_assets() {
        let (mut ledgers, assets) = Ledgers::with_standard_tokens(&["A", "B", "C"]);
        let alice = Address::from_label("alice");
        let pool = Address::from_label("pool");
        for asset in &assets {
            ledgers.mint(asset, &alice, 100).unwrap();
        }

        let snap = ledgers.snapshot_assets(&[assets[0], assets[1], AssetId::from_label("NOPE")]);
        assert_eq!(snap.len(), 2);
        ledgers.transfer(&assets[0], &alice, &pool, 60).unwrap();
        ledgers.transfer(&assets[2], &alice, &pool, 10).unwrap();
        ledgers.restore(snap);

        assert_eq!(ledgers.balance_of(&assets[0], &pool).unwrap(), 0);
        // Outside the snapshot, so it keeps its new state.
        assert_eq!(ledgers.balance_of(&assets[2], &pool).unwrap(), 10);
        assert_eq!(ledgers.len(), 3);
    }

    #[test]
    fn native_wrap_and_unwrap() {
        let mut ledgers = Ledgers::new();
        let weth = ledgers
            .register_native(WrappedNativeToken::labeled("WETH"))
            .unwrap();
        assert_eq!(ledgers.native_asset(), Some(weth));
        let alice = Address::from_label("alice");
        let pool = Address::from_label("pool");

        ledgers.fund_native(&alice, 1000).unwrap();
        ledgers.wrap_native(&alice, &pool, 300).unwrap();
        assert_eq!(ledgers.native_balance_of(&alice).unwrap(), 700);
        assert_eq!(ledgers.balance_of(&weth, &pool).unwrap(), 300);

        let snap = ledgers.snapshot_assets(&[weth]);
        ledgers.unwrap_native(&pool, &alice, 300).unwrap();
        assert_eq!(ledgers.native_balance_of(&alice).unwrap(), 1000);
        ledgers.restore(snap);
        assert_eq!(ledgers.native_balance_of(&alice).unwrap(), 700);
    }

    #[test]
    fn native_calls_need_a_native_asset() {
        let (mut ledgers, _) = Ledgers::with_standard_tokens(&["A"]);
        assert!(ledgers.native_asset().is_none());
        assert!(matches!(
            ledgers.fund_native(&Address::from_label("alice"), 1),
            Err(PairswapError::Configuration(_))
        ));
        ledgers
            .register_native(WrappedNativeToken::labeled("WETH"))
            .unwrap();
        assert!(ledgers
            .register_native(WrappedNativeToken::labeled("WETH2"))
            .is_err());
    }

    #[test]
    fn heterogeneous_ledgers() {
        let mut ledgers = Ledgers::new();
        let tax = ledgers
            .register(FeeOnTransferToken::labeled("TAX", 100).unwrap())
            .unwrap();
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");
        ledgers.mint(&tax, &alice, 1000).unwrap();
        ledgers.transfer(&tax, &alice, &bob, 1000).unwrap();
        assert_eq!(ledgers.balance_of(&tax, &bob).unwrap(), 990);
        let snap = ledgers.snapshot();
        ledgers.transfer(&tax, &bob, &alice, 990).unwrap();
        ledgers.restore(snap);
        assert_eq!(ledgers.balance_of(&tax, &bob).unwrap(), 990);
    }
}
