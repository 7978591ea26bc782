//! # Derived Projections
//!
//! Pure computation of the read-only projections: low-stock filtering,
//! recent-restock ordering, per-product analytics, and the dashboard
//! summary. Nothing here is stored - every function recomputes from the
//! authoritative collections it is handed.
//!
//! ## Trend Reconstruction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Stock Trend for one Product                                │
//! │                                                                         │
//! │  created_at          restock #1          restock #2                     │
//! │      │                   │                   │                          │
//! │      ▼                   ▼                   ▼                          │
//! │  (t0, previous_stock  (t1, new_stock)    (t2, new_stock)               │
//! │       of first entry,                                                   │
//! │       or current stock                                                  │
//! │       if never restocked)                                               │
//! │                                                                         │
//! │  change            = current_stock - trend[0].stock                     │
//! │  change_percentage = change / trend[0].stock * 100                      │
//! │                      (NaN sentinel when trend[0].stock == 0)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::{
    DashboardSummary, Product, ProductAnalytics, RestockLogEntry, StockTrendPoint,
};

/// Default number of entries returned by the recent-restocks query.
pub const DEFAULT_RECENT_RESTOCKS: usize = 5;

// =============================================================================
// Low Stock
// =============================================================================

/// Filters products at or below their low-stock threshold.
///
/// The comparison is inclusive (`stock <= threshold`); insertion order of
/// the input slice is preserved.
pub fn low_stock_products(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.is_low_stock())
        .cloned()
        .collect()
}

// =============================================================================
// Recent Restocks
// =============================================================================

/// Returns the `limit` most recent log entries, newest first.
///
/// Sorting is stable, so entries sharing a timestamp keep their insertion
/// order. Entries appended out of chronological order still come back
/// correctly sorted.
pub fn recent_restocks(log: &[RestockLogEntry], limit: usize) -> Vec<RestockLogEntry> {
    let mut sorted = log.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.truncate(limit);
    sorted
}

// =============================================================================
// Product Analytics
// =============================================================================

/// Computes the analytics projection for a single product.
///
/// The trend series starts at the product's creation (using the stock the
/// product had before its first restock, or the current stock if it was
/// never restocked) and gains one point per restock log entry. Aggregates
/// (min/max) are taken over the trend values, matching the dashboard's
/// analytics table.
pub fn product_analytics(product: &Product, log: &[RestockLogEntry]) -> ProductAnalytics {
    // Log entries for this product, oldest first. The log itself is
    // append-only, so a stable sort keeps same-timestamp entries ordered.
    let mut entries: Vec<&RestockLogEntry> = log
        .iter()
        .filter(|e| e.product_id == product.id)
        .collect();
    entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let initial_stock = entries
        .first()
        .map(|e| e.previous_stock)
        .unwrap_or(product.stock);

    let mut trends = Vec::with_capacity(entries.len() + 1);
    trends.push(StockTrendPoint {
        date: product.created_at,
        stock: initial_stock,
    });
    for entry in &entries {
        trends.push(StockTrendPoint {
            date: entry.timestamp,
            stock: entry.new_stock,
        });
    }

    let min_stock = trends.iter().map(|t| t.stock).min().unwrap_or(0);
    let max_stock = trends.iter().map(|t| t.stock).max().unwrap_or(0);

    let first_stock = trends[0].stock;
    let change = product.stock - first_stock;
    let change_percentage = if first_stock == 0 {
        f64::NAN
    } else {
        change as f64 / first_stock as f64 * 100.0
    };

    ProductAnalytics {
        id: product.id.clone(),
        name: product.name.clone(),
        sku: product.sku.clone(),
        current_stock: product.stock,
        min_stock,
        max_stock,
        change,
        change_percentage,
        trends,
    }
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Computes the aggregate dashboard counters from the current collections.
pub fn dashboard_summary(products: &[Product], log: &[RestockLogEntry]) -> DashboardSummary {
    DashboardSummary {
        total_products: products.len() as i64,
        low_stock_count: products.iter().filter(|p| p.is_low_stock()).count() as i64,
        out_of_stock_count: products.iter().filter(|p| p.is_out_of_stock()).count() as i64,
        total_stock_units: products.iter().map(|p| p.stock).sum(),
        total_restocks: log.len() as i64,
        last_restock_at: log.iter().map(|e| e.timestamp).max(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
