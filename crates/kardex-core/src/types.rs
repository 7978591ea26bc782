//! # Domain Types
//!
//! Core domain types used throughout Kardex.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Stored (owned by kardex-store)                                        │
//! │  ┌─────────────────┐   ┌─────────────────────┐                         │
//! │  │    Product      │   │  RestockLogEntry    │                         │
//! │  │  ─────────────  │   │  ─────────────────  │                         │
//! │  │  id (unique)    │   │  id (UUID)          │                         │
//! │  │  sku, name      │   │  product_id (FK)    │                         │
//! │  │  price_cents    │   │  previous/new stock │                         │
//! │  │  stock          │   │  append-only        │                         │
//! │  └─────────────────┘   └─────────────────────┘                         │
//! │                                                                         │
//! │  Derived (recomputed per query, never stored)                          │
//! │  ┌─────────────────┐   ┌─────────────────────┐                         │
//! │  │ DashboardSummary│   │  ProductAnalytics   │                         │
//! │  │  counts/totals  │   │  trend + min/max    │                         │
//! │  └─────────────────┘   └─────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! All types serialize with camelCase field names, matching what the
//! dashboard frontend consumes. `DateTime<Utc>` fields are exported to
//! TypeScript as ISO-8601 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// A product tracked by the inventory.
///
/// ## Identity
/// `id` is the unique identifier and is supplied by the caller on create
/// (the REST contract requires it in the request body). `sku` is the
/// human-readable business identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown in the product list and on restock logs.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Price in cents (smallest currency unit). Wire name: `price`.
    #[serde(rename = "price")]
    pub price_cents: i64,

    /// Current stock level. Invariant: never negative after an accepted
    /// operation.
    pub stock: i64,

    /// Stock level at or below which the product counts as low-stock
    /// (inclusive comparison).
    pub low_stock_threshold: i64,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated (restocks bump this too).
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether the product is at or below its low-stock threshold.
    ///
    /// The comparison is inclusive: a product sitting exactly on its
    /// threshold is still low-stock.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// Checks whether the product is completely out of stock.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// Input for creating a product.
///
/// ## Why a separate type?
/// The caller supplies identity and initial stock; the store owns the
/// timestamps. Mirrors the snapshot pattern used for log entries: the
/// stored `Product` is always constructed by the store itself.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub id: String,
    pub name: String,
    pub sku: String,
    /// Price in cents. Wire name: `price`.
    #[serde(rename = "price")]
    pub price_cents: i64,
    pub stock: i64,
    /// Defaults to [`crate::DEFAULT_LOW_STOCK_THRESHOLD`] when omitted.
    pub low_stock_threshold: Option<i64>,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    /// Price in cents. Wire name: `price`.
    #[serde(rename = "price")]
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

impl ProductPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.price_cents.is_none()
            && self.stock.is_none()
            && self.low_stock_threshold.is_none()
    }
}

// =============================================================================
// Restock Log
// =============================================================================

/// A restock log entry.
///
/// Uses the snapshot pattern to freeze product data at time of restock:
/// `product_name` stays valid even if the product is later renamed or
/// deleted. Entries are immutable once created and the log is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestockLogEntry {
    /// Unique identifier (UUID v4, generated by the store).
    pub id: String,

    /// Product this restock applied to.
    pub product_id: String,

    /// Product name at time of restock (frozen).
    pub product_name: String,

    /// Quantity added. Always positive.
    pub quantity: i64,

    /// Stock level before the restock.
    pub previous_stock: i64,

    /// Stock level after the restock (`previous_stock + quantity`).
    pub new_stock: i64,

    /// When the restock happened.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Derived Projections
// =============================================================================

/// One point of a product's stock trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockTrendPoint {
    /// When this stock level was observed.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Stock level at that moment.
    pub stock: i64,
}

/// Per-product analytics: a time-ordered stock trend plus aggregates.
///
/// ## Derivation
/// Recomputed from the product and its restock log on every query - the
/// first trend point is the product's creation, each log entry contributes
/// its resulting stock level at its timestamp.
///
/// ## Change Percentage
/// `change_percentage` is relative to the first trend point. When the first
/// recorded stock is zero the percentage is undefined and reported as the
/// NaN sentinel (serialized as `null` in JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductAnalytics {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    /// Absolute change: `current_stock - first trend point`.
    pub change: i64,
    /// Percentage change vs. the first trend point; NaN when undefined.
    pub change_percentage: f64,
    pub trends: Vec<StockTrendPoint>,
}

/// Aggregate dashboard counters.
///
/// Recomputed from the current store state on every query - never cached
/// server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    /// Number of products currently in the store.
    pub total_products: i64,

    /// Products at or below their low-stock threshold.
    pub low_stock_count: i64,

    /// Products with zero stock.
    pub out_of_stock_count: i64,

    /// Sum of stock across all products.
    pub total_stock_units: i64,

    /// Total restock log entries ever appended.
    pub total_restocks: i64,

    /// Timestamp of the most recent restock, if any.
    #[ts(as = "Option<String>")]
    pub last_restock_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
