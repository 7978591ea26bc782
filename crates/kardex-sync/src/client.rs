//! # Query Client
//!
//! The synchronization layer's public face: typed reads served through
//! cache slots, writes applied to the store followed by the declared
//! invalidation fan-out.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QueryClient Data Flow                            │
//! │                                                                         │
//! │  READ  caller ──► QueryCache slot ──► hit? return (source: Cache)       │
//! │                        │                                                │
//! │                        └─ miss ──► InventoryStore read op               │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                 result cached under its key             │
//! │                                 (source: Fetched)                       │
//! │                                                                         │
//! │  WRITE caller ──► InventoryStore write op (completes fully,             │
//! │                        │                   log append included)         │
//! │                        ▼                                                │
//! │                   WriteOp::invalidates() ──► each key's slot            │
//! │                                              dropped; next read         │
//! │                                              recomputes                 │
//! │                                                                         │
//! │  A FAILED write invalidates nothing: the store rejected it before       │
//! │  any state change, so every cached view is still accurate.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use kardex_core::{
    CoreResult, DashboardSummary, Product, ProductAnalytics, ProductDraft, ProductPatch,
    RestockLogEntry, DEFAULT_RECENT_RESTOCKS,
};
use kardex_store::InventoryStore;

use crate::key::{QueryKey, WriteOp};
use crate::slot::{QueryOutcome, Slot};

// =============================================================================
// Query Cache
// =============================================================================

/// One typed slot per query family, plus per-id slot maps for the
/// parameterized keys.
///
/// ## Why typed slots instead of one `HashMap<QueryKey, Box<dyn Any>>`?
/// Every key family caches a different result type. Giving each family
/// its own `Slot<T>` keeps the cache fully typed: a read can never get a
/// value of the wrong shape back, and the `invalidate` match below must
/// handle every key variant or the crate stops compiling.
#[derive(Default)]
pub struct QueryCache {
    products: Slot<Vec<Product>>,
    low_stock: Slot<Vec<Product>>,
    recent_restocks: Slot<Vec<RestockLogEntry>>,
    dashboard_summary: Slot<DashboardSummary>,
    analytics_all: Slot<Vec<ProductAnalytics>>,
    product_by_id: Mutex<HashMap<String, Arc<Slot<Option<Product>>>>>,
    analytics_by_id: Mutex<HashMap<String, Arc<Slot<Option<ProductAnalytics>>>>>,
}

impl QueryCache {
    fn product_slot(&self, id: &str) -> Arc<Slot<Option<Product>>> {
        let mut map = self.product_by_id.lock().expect("cache mutex poisoned");
        Arc::clone(
            map.entry(id.to_string())
                .or_insert_with(|| Arc::new(Slot::new())),
        )
    }

    fn analytics_slot(&self, id: &str) -> Arc<Slot<Option<ProductAnalytics>>> {
        let mut map = self.analytics_by_id.lock().expect("cache mutex poisoned");
        Arc::clone(
            map.entry(id.to_string())
                .or_insert_with(|| Arc::new(Slot::new())),
        )
    }

    /// Forces the next read of `key` to recompute from the store.
    pub fn invalidate(&self, key: &QueryKey) {
        debug!(key = %key, "Invalidating query key");
        match key {
            QueryKey::Products => self.products.invalidate(),
            QueryKey::LowStockProducts => self.low_stock.invalidate(),
            QueryKey::RecentRestocks => self.recent_restocks.invalidate(),
            QueryKey::DashboardSummary => self.dashboard_summary.invalidate(),
            QueryKey::Product(id) => {
                let map = self.product_by_id.lock().expect("cache mutex poisoned");
                if let Some(slot) = map.get(id) {
                    slot.invalidate();
                }
            }
            // The bare analytics key addresses the whole family: every
            // scope derives from the same restock log.
            QueryKey::ProductAnalytics(None) => {
                self.analytics_all.invalidate();
                let map = self.analytics_by_id.lock().expect("cache mutex poisoned");
                for slot in map.values() {
                    slot.invalidate();
                }
            }
            QueryKey::ProductAnalytics(Some(id)) => {
                let map = self.analytics_by_id.lock().expect("cache mutex poisoned");
                if let Some(slot) = map.get(id) {
                    slot.invalidate();
                }
            }
        }
    }
}

// =============================================================================
// Query Client
// =============================================================================

/// Reads and writes for the dashboard, with the cache-invalidation
/// contract applied on every successful write.
///
/// ## Usage
/// ```rust,ignore
/// let client = QueryClient::new(Arc::new(InventoryStore::new()));
///
/// let products = client.products().await;       // fetches, then caches
/// client.restock("p1", 3).await?;               // invalidates 5 keys
/// let products = client.products().await;       // recomputes
/// ```
pub struct QueryClient {
    store: Arc<InventoryStore>,
    cache: QueryCache,
    /// How many entries the recent-restocks view returns.
    recent_limit: usize,
}

impl QueryClient {
    /// Creates a client over the given store with the default
    /// recent-restocks limit (5).
    pub fn new(store: Arc<InventoryStore>) -> Self {
        QueryClient {
            store,
            cache: QueryCache::default(),
            recent_limit: DEFAULT_RECENT_RESTOCKS,
        }
    }

    /// Overrides the recent-restocks limit.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<InventoryStore> {
        &self.store
    }

    // =========================================================================
    // Reads (cache-through)
    // =========================================================================

    /// All products, insertion order.
    pub async fn products(&self) -> QueryOutcome<Vec<Product>> {
        self.cache
            .products
            .get_or_fetch(|| self.store.list_products())
            .await
    }

    /// One product by id; caches `None` for absent ids.
    pub async fn product(&self, id: &str) -> QueryOutcome<Option<Product>> {
        self.cache
            .product_slot(id)
            .get_or_fetch(|| self.store.get(id))
            .await
    }

    /// Products at or below their low-stock threshold.
    pub async fn low_stock_products(&self) -> QueryOutcome<Vec<Product>> {
        self.cache
            .low_stock
            .get_or_fetch(|| self.store.low_stock_products())
            .await
    }

    /// The most recent restock log entries, newest first.
    pub async fn recent_restocks(&self) -> QueryOutcome<Vec<RestockLogEntry>> {
        self.cache
            .recent_restocks
            .get_or_fetch(|| self.store.recent_restocks(self.recent_limit))
            .await
    }

    /// Analytics for every product.
    pub async fn product_analytics(&self) -> QueryOutcome<Vec<ProductAnalytics>> {
        self.cache
            .analytics_all
            .get_or_fetch(|| self.store.product_analytics())
            .await
    }

    /// Analytics for one product; `None` for absent ids.
    pub async fn product_analytics_for(&self, id: &str) -> QueryOutcome<Option<ProductAnalytics>> {
        self.cache
            .analytics_slot(id)
            .get_or_fetch(|| self.store.product_analytics_for(id))
            .await
    }

    /// Aggregate dashboard counters.
    pub async fn dashboard_summary(&self) -> QueryOutcome<DashboardSummary> {
        self.cache
            .dashboard_summary
            .get_or_fetch(|| self.store.dashboard_summary())
            .await
    }

    // =========================================================================
    // Writes (store, then invalidate)
    // =========================================================================

    /// Creates a product, then invalidates the create row of the table.
    pub async fn create_product(&self, draft: ProductDraft) -> CoreResult<Product> {
        let product = self.store.insert(draft).await?;
        self.apply_write(WriteOp::CreateProduct);
        Ok(product)
    }

    /// Patches a product, then invalidates the update row (including the
    /// per-id key).
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> CoreResult<Product> {
        let product = self.store.update(id, patch).await?;
        self.apply_write(WriteOp::UpdateProduct { id: id.to_string() });
        Ok(product)
    }

    /// Deletes a product, then invalidates the delete row.
    pub async fn delete_product(&self, id: &str) -> CoreResult<()> {
        self.store.remove(id).await?;
        self.apply_write(WriteOp::DeleteProduct);
        Ok(())
    }

    /// Restocks a product. The store write completes fully - stock
    /// adjusted AND log entry appended - before any key is invalidated,
    /// so an invalidated read can never observe the half-applied write.
    pub async fn restock(&self, id: &str, quantity: i64) -> CoreResult<RestockLogEntry> {
        let entry = self.store.restock(id, quantity).await?;
        self.apply_write(WriteOp::Restock);
        Ok(entry)
    }

    /// Fans a successful write out to its declared invalidation set.
    fn apply_write(&self, op: WriteOp) {
        info!(op = %op, "Write committed, invalidating dependent keys");
        for key in op.invalidates() {
            self.cache.invalidate(&key);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::QuerySource;

    fn draft(id: &str, stock: i64, threshold: i64) -> ProductDraft {
        ProductDraft {
            id: id.to_string(),
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            price_cents: 250,
            stock,
            low_stock_threshold: Some(threshold),
        }
    }

    fn client() -> QueryClient {
        QueryClient::new(Arc::new(InventoryStore::new()))
    }

    #[tokio::test]
    async fn test_read_fetches_then_serves_from_cache() {
        let client = client();
        client.create_product(draft("p1", 3, 5)).await.unwrap();

        let first = client.products().await;
        assert_eq!(first.source, QuerySource::Fetched);
        assert_eq!(first.value.len(), 1);

        let second = client.products().await;
        assert_eq!(second.source, QuerySource::Cache);
    }

    #[tokio::test]
    async fn test_create_invalidates_its_row() {
        let client = client();
        client.create_product(draft("p1", 3, 5)).await.unwrap();

        // Warm every cache.
        client.products().await;
        client.low_stock_products().await;
        client.dashboard_summary().await;
        client.recent_restocks().await;

        client.create_product(draft("p2", 100, 5)).await.unwrap();

        // The declared keys recompute...
        assert!(client.products().await.was_fetched());
        assert!(client.low_stock_products().await.was_fetched());
        assert!(client.dashboard_summary().await.was_fetched());
        // ...and the undeclared one is still cached.
        assert_eq!(client.recent_restocks().await.source, QuerySource::Cache);

        assert_eq!(client.products().await.value.len(), 2);
    }

    #[tokio::test]
    async fn test_update_invalidates_per_id_key() {
        let client = client();
        client.create_product(draft("p1", 3, 5)).await.unwrap();

        let before = client.product("p1").await;
        assert!(before.was_fetched());

        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        client.update_product("p1", patch).await.unwrap();

        let after = client.product("p1").await;
        assert!(after.was_fetched());
        assert_eq!(after.value.as_ref().as_ref().unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_restock_invalidates_its_row_but_not_product_by_id() {
        let client = client();
        client.create_product(draft("p1", 2, 5)).await.unwrap();

        // Warm every cache.
        client.products().await;
        client.product("p1").await;
        client.low_stock_products().await;
        client.recent_restocks().await;
        client.dashboard_summary().await;
        client.product_analytics().await;
        client.product_analytics_for("p1").await;

        let entry = client.restock("p1", 3).await.unwrap();
        assert_eq!(entry.previous_stock, 2);
        assert_eq!(entry.new_stock, 5);

        // Every key in the restock row recomputes.
        assert!(client.products().await.was_fetched());
        assert!(client.low_stock_products().await.was_fetched());
        assert!(client.recent_restocks().await.was_fetched());
        assert!(client.dashboard_summary().await.was_fetched());
        assert!(client.product_analytics().await.was_fetched());
        // Per-id analytics belong to the invalidated family.
        assert!(client.product_analytics_for("p1").await.was_fetched());

        // product[id] is NOT in the restock row: still the cached snapshot.
        let cached = client.product("p1").await;
        assert_eq!(cached.source, QuerySource::Cache);
        assert_eq!(cached.value.as_ref().as_ref().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_reads_after_restock_see_the_write() {
        let client = client();
        client.create_product(draft("p1", 2, 5)).await.unwrap();
        client.products().await;
        client.low_stock_products().await;

        client.restock("p1", 3).await.unwrap();

        let products = client.products().await;
        assert_eq!(products.value[0].stock, 5);

        // 5 <= 5: inclusive threshold keeps p1 low-stock.
        let low = client.low_stock_products().await;
        assert_eq!(low.value.len(), 1);
        assert_eq!(low.value[0].stock, 5);

        let recent = client.recent_restocks().await;
        assert_eq!(recent.value.len(), 1);
        assert_eq!(recent.value[0].quantity, 3);

        let summary = client.dashboard_summary().await;
        assert_eq!(summary.value.total_restocks, 1);
    }

    #[tokio::test]
    async fn test_failed_write_invalidates_nothing() {
        let client = client();
        client.create_product(draft("p1", 2, 5)).await.unwrap();
        client.products().await;
        client.dashboard_summary().await;

        assert!(client.restock("ghost", 5).await.is_err());
        assert!(client.restock("p1", 0).await.is_err());
        assert!(client.create_product(draft("p1", 9, 9)).await.is_err());

        // No invalidation happened: caches are still warm.
        assert_eq!(client.products().await.source, QuerySource::Cache);
        assert_eq!(client.dashboard_summary().await.source, QuerySource::Cache);
    }

    #[tokio::test]
    async fn test_delete_invalidates_its_row() {
        let client = client();
        client.create_product(draft("p1", 2, 5)).await.unwrap();
        client.products().await;
        client.low_stock_products().await;
        client.dashboard_summary().await;

        client.delete_product("p1").await.unwrap();

        let products = client.products().await;
        assert!(products.was_fetched());
        assert!(products.value.is_empty());
        assert!(client.low_stock_products().await.was_fetched());
        assert!(client.dashboard_summary().await.was_fetched());
    }

    #[tokio::test]
    async fn test_product_read_caches_absent_ids() {
        let client = client();
        let miss = client.product("ghost").await;
        assert!(miss.was_fetched());
        assert!(miss.value.is_none());

        let again = client.product("ghost").await;
        assert_eq!(again.source, QuerySource::Cache);
    }
}
