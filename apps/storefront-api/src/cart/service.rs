//! # Cart Service
//!
//! Orchestrates the session mapping, catalog lookups and pricing.
//!
//! ## Mutation Flow
//! ```text
//! add_to_cart(id, qty)
//!   │
//!   ├── lookup.get_product(id) ── NotFound ──► CartError (no mutation)
//!   │
//!   ├── locks.acquire(session)
//!   │     store.get ─► LineItems::add ─► store.set
//!   ├── (lock released)
//!   │
//!   └── get_cart(session) ─► resolve every item ─► repair stale ─► price
//! ```
//!
//! `get_cart` may write: references that fail to resolve are purged from the
//! stored mapping before the snapshot is returned.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use storefront_core::cart::{LineItems, Resolution};
use storefront_core::pricing::DiscountPolicy;
use storefront_core::{Cart, CoreError, ProductId};

use crate::ports::{LookupError, ProductLookup, SessionError, SessionStore};
use crate::session::{SessionId, SessionLocks};

// =============================================================================
// Errors
// =============================================================================

/// Failures surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The catalog could not confirm the product (not a not-found).
    #[error(transparent)]
    Catalog(LookupError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Settings
// =============================================================================

/// Per-deployment cart settings.
#[derive(Debug, Clone)]
pub struct CartSettings {
    /// Session key the mapping is stored under.
    pub session_key: String,
    pub policy: DiscountPolicy,
    pub currency: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            session_key: "cart".to_string(),
            policy: DiscountPolicy::default(),
            currency: storefront_core::DEFAULT_CURRENCY.to_string(),
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Cart aggregation over a product lookup and a session store.
pub struct CartService {
    lookup: Arc<dyn ProductLookup>,
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
    settings: CartSettings,
}

impl CartService {
    pub fn new(
        lookup: Arc<dyn ProductLookup>,
        store: Arc<dyn SessionStore>,
        settings: CartSettings,
    ) -> Self {
        CartService {
            lookup,
            store,
            locks: SessionLocks::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &CartSettings {
        &self.settings
    }

    async fn load(&self, session: &SessionId) -> CartResult<LineItems> {
        Ok(self.store.get(session, &self.settings.session_key).await?)
    }

    async fn save(&self, session: &SessionId, items: &LineItems) -> CartResult<()> {
        Ok(self
            .store
            .set(session, &self.settings.session_key, items)
            .await?)
    }

    /// Resolves the stored mapping into a priced snapshot, purging stale items.
    pub async fn get_cart(&self, session: &SessionId) -> CartResult<Cart> {
        let items = self.load(session).await?;
        if items.is_empty() {
            return Ok(Cart::empty(&self.settings.currency));
        }

        let mut lookups = Vec::with_capacity(items.len());
        for item in items.iter() {
            let product = match self.lookup.get_product(item.product_id).await {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(product_id = %item.product_id, error = %e, "Dropping unresolvable cart item");
                    None
                }
            };
            lookups.push((*item, product));
        }

        let resolution = Resolution::from_lookups(lookups);
        if resolution.needs_repair() {
            self.repair(session, &resolution).await?;
        }

        let cart = resolution.into_cart(&self.settings.policy, &self.settings.currency);
        debug!(items = cart.items.len(), total = %cart.totals.total, "Cart resolved");
        Ok(cart)
    }

    /// Persists the purge of stale references.
    ///
    /// Re-reads under the lock so a concurrent mutation is not overwritten.
    async fn repair(&self, session: &SessionId, resolution: &Resolution) -> CartResult<()> {
        let _guard = self.locks.acquire(session).await;
        let mut items = self.load(session).await?;

        if resolution.repair(&mut items) {
            self.save(session, &items).await?;
            info!(
                session_id = %session,
                purged = resolution.stale().len(),
                "Purged stale cart items"
            );
        }
        Ok(())
    }

    /// Adds `quantity` of a product, incrementing an existing line.
    pub async fn add_to_cart(
        &self,
        session: &SessionId,
        product_id: ProductId,
        quantity: u32,
    ) -> CartResult<Cart> {
        match self.lookup.get_product(product_id).await {
            Ok(_) => {}
            Err(LookupError::NotFound(id)) => {
                return Err(CoreError::ProductNotFound(id).into());
            }
            Err(e) => return Err(CartError::Catalog(e)),
        }

        {
            let _guard = self.locks.acquire(session).await;
            let mut items = self.load(session).await?;
            items.add(product_id, quantity);
            self.save(session, &items).await?;
        }

        info!(product_id = %product_id, quantity, "Product added to cart");
        self.get_cart(session).await
    }

    /// Sets a line's quantity; zero removes the line.
    pub async fn update_cart_item(
        &self,
        session: &SessionId,
        product_id: ProductId,
        quantity: u32,
    ) -> CartResult<Cart> {
        if quantity == 0 {
            return self.remove_from_cart(session, product_id).await;
        }

        {
            let _guard = self.locks.acquire(session).await;
            let mut items = self.load(session).await?;
            items.set_quantity(product_id, quantity)?;
            self.save(session, &items).await?;
        }

        info!(product_id = %product_id, quantity, "Cart item updated");
        self.get_cart(session).await
    }

    /// Removes a line. Absent lines are a no-op.
    pub async fn remove_from_cart(
        &self,
        session: &SessionId,
        product_id: ProductId,
    ) -> CartResult<Cart> {
        {
            let _guard = self.locks.acquire(session).await;
            let mut items = self.load(session).await?;
            if items.remove(product_id) {
                self.save(session, &items).await?;
                info!(product_id = %product_id, "Product removed from cart");
            }
        }

        self.get_cart(session).await
    }

    /// Deletes the whole mapping.
    pub async fn clear_cart(&self, session: &SessionId) -> CartResult<Cart> {
        {
            let _guard = self.locks.acquire(session).await;
            self.store
                .remove(session, &self.settings.session_key)
                .await?;
        }

        info!(session_id = %session, "Cart cleared");
        self.get_cart(session).await
    }

    /// Sum of stored quantities. Does not contact the catalog.
    pub async fn cart_items_count(&self, session: &SessionId) -> CartResult<u64> {
        Ok(self.load(session).await?.total_quantity())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use storefront_core::{Money, Product};

    fn pid(id: u32) -> ProductId {
        ProductId::new(id)
    }

    fn product(id: u32, price: &str) -> Product {
        Product {
            id: pid(id),
            title: format!("Product {}", id),
            price: price.parse().unwrap(),
            currency: "EUR".to_string(),
            description: String::new(),
            category: "test".to_string(),
            image: String::new(),
            rating: None,
        }
    }

    /// Lookup with scripted outcomes and a call counter.
    #[derive(Default)]
    struct MockLookup {
        products: Mutex<HashMap<ProductId, Product>>,
        failing: Mutex<HashMap<ProductId, LookupError>>,
        calls: AtomicUsize,
    }

    impl MockLookup {
        fn with(products: &[Product]) -> Arc<Self> {
            let mock = MockLookup::default();
            {
                let mut map = mock.products.lock().unwrap();
                for p in products {
                    map.insert(p.id, p.clone());
                }
            }
            Arc::new(mock)
        }

        fn delete(&self, id: ProductId) {
            self.products.lock().unwrap().remove(&id);
        }

        fn fail(&self, id: ProductId, err: LookupError) {
            self.failing.lock().unwrap().insert(id, err);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductLookup for MockLookup {
        async fn get_product(&self, id: ProductId) -> Result<Product, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.failing.lock().unwrap().get(&id) {
                return Err(err.clone());
            }
            self.products
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(LookupError::NotFound(id))
        }
    }

    fn service(lookup: Arc<MockLookup>) -> (CartService, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let service = CartService::new(lookup, store.clone(), CartSettings::default());
        (service, store)
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_lookups() {
        let lookup = MockLookup::with(&[]);
        let (service, _) = service(lookup.clone());

        let cart = service.get_cart(&SessionId::generate()).await.unwrap();

        assert!(cart.is_empty());
        assert!(!cart.totals.has_discount);
        assert!(cart.totals.total.is_zero());
        assert_eq!(cart.totals.currency, "EUR");
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_add_increments_existing_line() {
        let lookup = MockLookup::with(&[product(1, "10.00")]);
        let (service, store) = service(lookup);
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        let cart = service.add_to_cart(&session, pid(1), 2).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(
            store.get(&session, "cart").await.unwrap().get(pid(1)),
            Some(3)
        );
    }

    #[tokio::test]
    async fn test_add_unknown_product_does_not_touch_session() {
        let lookup = MockLookup::with(&[]);
        let (service, store) = service(lookup);
        let session = SessionId::generate();

        let err = service.add_to_cart(&session, pid(9), 1).await.unwrap_err();

        assert!(matches!(err, CartError::Core(CoreError::ProductNotFound(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_with_catalog_down_is_catalog_error() {
        let lookup = MockLookup::with(&[product(1, "10.00")]);
        lookup.fail(pid(1), LookupError::Transport("timeout".into()));
        let (service, store) = service(lookup);

        let err = service
            .add_to_cart(&SessionId::generate(), pid(1), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Catalog(LookupError::Transport(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stale_items_are_purged_and_stay_purged() {
        let lookup = MockLookup::with(&[product(1, "10.00"), product(2, "5.00")]);
        let (service, store) = service(lookup.clone());
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        service.add_to_cart(&session, pid(2), 2).await.unwrap();
        lookup.delete(pid(2));

        let cart = service.get_cart(&session).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, pid(1));
        assert!(!store.get(&session, "cart").await.unwrap().contains(pid(2)));

        let before = lookup.calls();
        let again = service.get_cart(&session).await.unwrap();
        assert_eq!(again, cart);
        // Only the surviving item is looked up
        assert_eq!(lookup.calls() - before, 1);
    }

    #[tokio::test]
    async fn test_transport_failure_during_read_purges() {
        let lookup = MockLookup::with(&[product(1, "10.00"), product(2, "5.00")]);
        let (service, store) = service(lookup.clone());
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        service.add_to_cart(&session, pid(2), 1).await.unwrap();
        lookup.fail(pid(1), LookupError::Transport("reset".into()));

        let cart = service.get_cart(&session).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, pid(2));

        let stored = store.get(&session, "cart").await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let lookup = MockLookup::with(&[product(1, "10.00"), product(2, "5.00")]);
        let (service, _) = service(lookup);
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        service.add_to_cart(&session, pid(2), 1).await.unwrap();

        let cart = service.update_cart_item(&session, pid(1), 0).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, pid(2));
    }

    #[tokio::test]
    async fn test_update_sets_quantity() {
        let lookup = MockLookup::with(&[product(1, "100.00")]);
        let (service, _) = service(lookup);
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 5).await.unwrap();
        let cart = service.update_cart_item(&session, pid(1), 2).await.unwrap();

        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.totals.subtotal, Money::from_major(200));
        assert_eq!(cart.totals.discount, Money::from_major(20));
        assert_eq!(cart.totals.total, Money::from_major(180));
        assert!(cart.totals.has_discount);
    }

    #[tokio::test]
    async fn test_update_missing_item_fails_without_mutation() {
        let lookup = MockLookup::with(&[product(1, "10.00")]);
        let (service, store) = service(lookup);
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        let before = store.get(&session, "cart").await.unwrap();

        let err = service
            .update_cart_item(&session, pid(7), 3)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Core(CoreError::ItemNotInCart(_))));
        assert_eq!(store.get(&session, "cart").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let lookup = MockLookup::with(&[product(1, "10.00")]);
        let (service, _) = service(lookup);
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        let cart = service.remove_from_cart(&session, pid(5)).await.unwrap();
        assert_eq!(cart.items.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let lookup = MockLookup::with(&[product(1, "10.00")]);
        let (service, store) = service(lookup);
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        let cart = service.clear_cart(&session).await.unwrap();

        assert!(cart.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_count_ignores_staleness() {
        let lookup = MockLookup::with(&[product(1, "10.00"), product(2, "5.00")]);
        let (service, _) = service(lookup.clone());
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 2).await.unwrap();
        service.add_to_cart(&session, pid(2), 3).await.unwrap();
        lookup.delete(pid(1));

        let before = lookup.calls();
        assert_eq!(service.cart_items_count(&session).await.unwrap(), 5);
        assert_eq!(lookup.calls(), before);
    }

    /// Lookup that parks the first request for `parked` until released,
    /// then fails it as a transport error. Later lookups succeed.
    struct ParkedLookup {
        inner: Arc<MockLookup>,
        parked: Mutex<Option<ProductId>>,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl ProductLookup for ParkedLookup {
        async fn get_product(&self, id: ProductId) -> Result<Product, LookupError> {
            let park = {
                let mut parked = self.parked.lock().unwrap();
                if *parked == Some(id) {
                    parked.take();
                    true
                } else {
                    false
                }
            };
            if park {
                self.entered.notify_one();
                self.release.notified().await;
                return Err(LookupError::Transport("reset".into()));
            }
            self.inner.get_product(id).await
        }
    }

    #[tokio::test]
    async fn test_repair_keeps_item_re_added_during_read() {
        let inner = MockLookup::with(&[product(1, "10.00"), product(2, "5.00")]);
        let lookup = Arc::new(ParkedLookup {
            inner,
            parked: Mutex::new(None),
            entered: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let store = Arc::new(MemorySessionStore::new());
        let service = Arc::new(CartService::new(
            lookup.clone(),
            store.clone(),
            CartSettings::default(),
        ));
        let session = SessionId::generate();

        service.add_to_cart(&session, pid(1), 1).await.unwrap();
        service.add_to_cart(&session, pid(2), 1).await.unwrap();
        *lookup.parked.lock().unwrap() = Some(pid(2));

        let reader = {
            let service = service.clone();
            tokio::spawn(async move { service.get_cart(&session).await })
        };
        lookup.entered.notified().await;

        // Lands while the read is still resolving product 2
        service.add_to_cart(&session, pid(2), 1).await.unwrap();
        assert_eq!(store.get(&session, "cart").await.unwrap().get(pid(2)), Some(2));

        lookup.release.notify_one();
        let cart = reader.await.unwrap().unwrap();
        assert_eq!(cart.items.len(), 1);

        assert_eq!(store.get(&session, "cart").await.unwrap().get(pid(2)), Some(2));
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let lookup = MockLookup::with(&[product(1, "1.00")]);
        let (service, store) = service(lookup);
        let service = Arc::new(service);
        let session = SessionId::generate();

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.add_to_cart(&session, pid(1), 1).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(
            store.get(&session, "cart").await.unwrap().get(pid(1)),
            Some(10)
        );
    }
}
