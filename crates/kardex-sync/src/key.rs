//! # Query Keys and the Invalidation Table
//!
//! The cache identities exposed to presentation components, and the static
//! mapping from each write to the read-caches it must invalidate.
//!
//! ## Why an enum instead of strings?
//! String-keyed caches (`["products"]`, `["product", id]`, ...) let a typo
//! silently create a key nothing ever invalidates. As a tagged union, the
//! invalidation matrix below is checked by the compiler: adding a key
//! without deciding who invalidates it is a non-exhaustive-match error,
//! not a stale view.
//!
//! ## The Invalidation Table
//! ```text
//! ┌───────────────────┬────────────────────────────────────────────────────┐
//! │ Write             │ Invalidates                                        │
//! ├───────────────────┼────────────────────────────────────────────────────┤
//! │ create product    │ products, lowStockProducts, dashboardSummary       │
//! │ update product    │ products, product[id], lowStockProducts,           │
//! │                   │ dashboardSummary                                   │
//! │ delete product    │ products, lowStockProducts, dashboardSummary       │
//! │ restock           │ products, lowStockProducts, recentRestocks,        │
//! │                   │ dashboardSummary, productAnalytics                 │
//! └───────────────────┴────────────────────────────────────────────────────┘
//! ```

use std::fmt;

// =============================================================================
// Query Key
// =============================================================================

/// Identity under which a read result is memoized.
///
/// One variant per derived view the dashboard consumes. Parameterized
/// queries carry their parameter so `product[p1]` and `product[p2]` are
/// distinct cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full product list, insertion order.
    Products,

    /// Products at or below their low-stock threshold.
    LowStockProducts,

    /// A single product by id.
    Product(String),

    /// The most recent restock log entries.
    RecentRestocks,

    /// The aggregate dashboard counters.
    DashboardSummary,

    /// Product analytics. `None` addresses the whole analytics family
    /// (the all-products projection plus every per-id scope); `Some(id)`
    /// addresses one product's scope only. Every scope derives from the
    /// same restock log, so writes invalidate the family as a unit.
    ProductAnalytics(Option<String>),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Products => write!(f, "products"),
            QueryKey::LowStockProducts => write!(f, "lowStockProducts"),
            QueryKey::Product(id) => write!(f, "product[{}]", id),
            QueryKey::RecentRestocks => write!(f, "recentRestocks"),
            QueryKey::DashboardSummary => write!(f, "dashboardSummary"),
            QueryKey::ProductAnalytics(None) => write!(f, "productAnalytics"),
            QueryKey::ProductAnalytics(Some(id)) => write!(f, "productAnalytics[{}]", id),
        }
    }
}

// =============================================================================
// Write Operations
// =============================================================================

/// The write operations the cache knows about.
///
/// Each variant maps to a statically declared invalidation set via
/// [`WriteOp::invalidates`]. Only `UpdateProduct` carries its id: it is
/// the one row of the table that invalidates a parameterized key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    CreateProduct,
    UpdateProduct { id: String },
    DeleteProduct,
    Restock,
}

impl WriteOp {
    /// The statically declared set of keys this write invalidates.
    ///
    /// This is the invalidation table reproduced exactly; tests pin every
    /// row. Note what is absent as much as what is present: restock does
    /// NOT invalidate `product[id]` - the by-id cache entry keeps its
    /// pre-restock snapshot until an update to that product invalidates
    /// it.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            WriteOp::CreateProduct => vec![
                QueryKey::Products,
                QueryKey::LowStockProducts,
                QueryKey::DashboardSummary,
            ],
            WriteOp::UpdateProduct { id } => vec![
                QueryKey::Products,
                QueryKey::Product(id.clone()),
                QueryKey::LowStockProducts,
                QueryKey::DashboardSummary,
            ],
            WriteOp::DeleteProduct => vec![
                QueryKey::Products,
                QueryKey::LowStockProducts,
                QueryKey::DashboardSummary,
            ],
            WriteOp::Restock => vec![
                QueryKey::Products,
                QueryKey::LowStockProducts,
                QueryKey::RecentRestocks,
                QueryKey::DashboardSummary,
                QueryKey::ProductAnalytics(None),
            ],
        }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::CreateProduct => write!(f, "createProduct"),
            WriteOp::UpdateProduct { id } => write!(f, "updateProduct[{}]", id),
            WriteOp::DeleteProduct => write!(f, "deleteProduct"),
            WriteOp::Restock => write!(f, "restock"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_invalidation_row() {
        assert_eq!(
            WriteOp::CreateProduct.invalidates(),
            vec![
                QueryKey::Products,
                QueryKey::LowStockProducts,
                QueryKey::DashboardSummary,
            ]
        );
    }

    #[test]
    fn test_update_invalidation_row() {
        let op = WriteOp::UpdateProduct {
            id: "p1".to_string(),
        };
        assert_eq!(
            op.invalidates(),
            vec![
                QueryKey::Products,
                QueryKey::Product("p1".to_string()),
                QueryKey::LowStockProducts,
                QueryKey::DashboardSummary,
            ]
        );
    }

    #[test]
    fn test_delete_invalidation_row() {
        assert_eq!(
            WriteOp::DeleteProduct.invalidates(),
            vec![
                QueryKey::Products,
                QueryKey::LowStockProducts,
                QueryKey::DashboardSummary,
            ]
        );
    }

    #[test]
    fn test_restock_invalidation_row() {
        assert_eq!(
            WriteOp::Restock.invalidates(),
            vec![
                QueryKey::Products,
                QueryKey::LowStockProducts,
                QueryKey::RecentRestocks,
                QueryKey::DashboardSummary,
                QueryKey::ProductAnalytics(None),
            ]
        );
    }

    #[test]
    fn test_restock_does_not_invalidate_product_by_id() {
        let keys = WriteOp::Restock.invalidates();
        assert!(!keys
            .iter()
            .any(|k| matches!(k, QueryKey::Product(_))));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(QueryKey::Products.to_string(), "products");
        assert_eq!(
            QueryKey::Product("p1".to_string()).to_string(),
            "product[p1]"
        );
        assert_eq!(
            QueryKey::ProductAnalytics(None).to_string(),
            "productAnalytics"
        );
        assert_eq!(
            QueryKey::ProductAnalytics(Some("p1".to_string())).to_string(),
            "productAnalytics[p1]"
        );
    }
}
