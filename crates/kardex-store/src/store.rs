//! # Inventory Store
//!
//! The single source of truth for products and restock log entries.
//!
//! ## Key Operations
//! - CRUD on products (insert rejects duplicate ids; update/remove fail
//!   with not-found on unknown ids)
//! - The restock write: the one operation with multi-entity effects
//! - Read operations delegating to the pure projections in kardex-core
//!
//! ## Restock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       restock(id, quantity)                             │
//! │                                                                         │
//! │  validate quantity (> 0, bounded)  ◄── fails BEFORE any mutation        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  acquire write lock                                                     │
//! │       │                                                                 │
//! │       ├── product missing? ──► NotFound, store untouched                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stock += quantity, updated_at = now                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  append RestockLogEntry { previous_stock, new_stock, ... }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  release lock, return the entry                                         │
//! │                                                                         │
//! │  Both effects happen under ONE guard: readers never see the stock       │
//! │  bumped without its log entry, or vice versa.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use kardex_core::projections;
use kardex_core::validation::{
    validate_low_stock_threshold, validate_price_cents, validate_product_draft,
    validate_product_name, validate_restock_quantity, validate_sku, validate_stock,
};
use kardex_core::{
    CoreError, CoreResult, DashboardSummary, Product, ProductAnalytics, ProductDraft,
    ProductPatch, RestockLogEntry, DEFAULT_LOW_STOCK_THRESHOLD,
};

/// Interior state, only ever touched through the lock.
#[derive(Debug, Default)]
struct StoreInner {
    /// Products in insertion order. Lookups are linear scans; the working
    /// set is a single shop's catalog, small enough that an index would
    /// not pay for itself.
    products: Vec<Product>,

    /// Append-only restock log.
    restock_log: Vec<RestockLogEntry>,
}

/// The authoritative in-memory inventory store.
///
/// ## Ownership
/// Constructed once at process start and shared behind an `Arc`. No other
/// component holds writable references to the collections.
///
/// ## Usage
/// ```rust,ignore
/// let store = Arc::new(InventoryStore::new());
/// let product = store.insert(draft).await?;
/// let entry = store.restock(&product.id, 3).await?;
/// ```
#[derive(Debug, Default)]
pub struct InventoryStore {
    inner: RwLock<StoreInner>,
}

impl InventoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        InventoryStore {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Inserts a new product.
    ///
    /// ## Errors
    /// - `CoreError::Validation` - a field fails validation
    /// - `CoreError::DuplicateProduct` - the id is already taken
    ///
    /// Both are detected before any mutation; on error the store is
    /// unchanged.
    pub async fn insert(&self, draft: ProductDraft) -> CoreResult<Product> {
        validate_product_draft(&draft)?;

        let mut inner = self.inner.write().await;

        if inner.products.iter().any(|p| p.id == draft.id) {
            return Err(CoreError::DuplicateProduct(draft.id));
        }

        let now = Utc::now();
        let product = Product {
            id: draft.id,
            name: draft.name,
            sku: draft.sku,
            price_cents: draft.price_cents,
            stock: draft.stock,
            low_stock_threshold: draft
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, sku = %product.sku, "Inserting product");
        inner.products.push(product.clone());
        Ok(product)
    }

    /// Applies a partial update to an existing product.
    ///
    /// `None` fields are left untouched; `updated_at` is bumped. Fails
    /// with `NotFound` on an unknown id, leaving the store unchanged.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> CoreResult<Product> {
        // Field-level validation happens before the lock is taken.
        if let Some(name) = &patch.name {
            validate_product_name(name)?;
        }
        if let Some(sku) = &patch.sku {
            validate_sku(sku)?;
        }
        if let Some(price_cents) = patch.price_cents {
            validate_price_cents(price_cents)?;
        }
        if let Some(stock) = patch.stock {
            validate_stock(stock)?;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            validate_low_stock_threshold(threshold)?;
        }

        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        debug!(id = %id, "Updating product");

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(sku) = patch.sku {
            product.sku = sku;
        }
        if let Some(price_cents) = patch.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    /// Removes a product by id.
    ///
    /// The restock log is deliberately left alone: log entries are
    /// immutable history and carry their own name snapshot.
    pub async fn remove(&self, id: &str) -> CoreResult<()> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);

        if inner.products.len() == before {
            return Err(CoreError::ProductNotFound(id.to_string()));
        }

        debug!(id = %id, "Removed product");
        Ok(())
    }

    /// Restocks a product: the one write with multi-entity effects.
    ///
    /// Adds `quantity` to the product's stock, bumps `updated_at`, and
    /// appends a log entry capturing the before/after stock - all under a
    /// single write guard.
    ///
    /// ## Errors
    /// - `CoreError::Validation` - quantity is zero, negative, or above
    ///   the restock bound (checked before any mutation)
    /// - `CoreError::ProductNotFound` - unknown id; all collections are
    ///   left exactly as they were
    pub async fn restock(&self, id: &str, quantity: i64) -> CoreResult<RestockLogEntry> {
        validate_restock_quantity(quantity)?;

        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        let now = Utc::now();
        let previous_stock = product.stock;
        let new_stock = previous_stock + quantity;

        product.stock = new_stock;
        product.updated_at = now;

        let entry = RestockLogEntry {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            previous_stock,
            new_stock,
            timestamp: now,
        };

        debug!(
            id = %id,
            quantity = quantity,
            previous_stock = previous_stock,
            new_stock = new_stock,
            "Restocked product"
        );

        inner.restock_log.push(entry.clone());
        Ok(entry)
    }

    /// Appends a pre-built log entry.
    ///
    /// Part of the store contract for completeness; normal operation goes
    /// through [`InventoryStore::restock`], which builds the entry itself.
    pub async fn append_log(&self, entry: RestockLogEntry) {
        let mut inner = self.inner.write().await;
        inner.restock_log.push(entry);
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Gets a product by id. `None` when absent.
    pub async fn get(&self, id: &str) -> Option<Product> {
        let inner = self.inner.read().await;
        inner.products.iter().find(|p| p.id == id).cloned()
    }

    /// Lists all products in insertion order.
    pub async fn list_products(&self) -> Vec<Product> {
        let inner = self.inner.read().await;
        inner.products.clone()
    }

    /// Lists products at or below their low-stock threshold (inclusive).
    pub async fn low_stock_products(&self) -> Vec<Product> {
        let inner = self.inner.read().await;
        projections::low_stock_products(&inner.products)
    }

    /// Returns the `limit` most recent restock log entries, newest first.
    pub async fn recent_restocks(&self, limit: usize) -> Vec<RestockLogEntry> {
        let inner = self.inner.read().await;
        projections::recent_restocks(&inner.restock_log, limit)
    }

    /// Computes the analytics projection for every product.
    pub async fn product_analytics(&self) -> Vec<ProductAnalytics> {
        let inner = self.inner.read().await;
        inner
            .products
            .iter()
            .map(|p| projections::product_analytics(p, &inner.restock_log))
            .collect()
    }

    /// Computes the analytics projection for one product. `None` when the
    /// product is absent (mirrors the by-id read, not an error).
    pub async fn product_analytics_for(&self, id: &str) -> Option<ProductAnalytics> {
        let inner = self.inner.read().await;
        inner
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| projections::product_analytics(p, &inner.restock_log))
    }

    /// Computes the aggregate dashboard counters from current state.
    pub async fn dashboard_summary(&self) -> DashboardSummary {
        let inner = self.inner.read().await;
        projections::dashboard_summary(&inner.products, &inner.restock_log)
    }

    /// Full restock log in append order (diagnostics and tests).
    pub async fn restock_log(&self) -> Vec<RestockLogEntry> {
        let inner = self.inner.read().await;
        inner.restock_log.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
