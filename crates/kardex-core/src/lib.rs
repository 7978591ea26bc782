//! # kardex-core: Pure Domain Logic for Kardex
//!
//! This crate is the **heart** of Kardex. It contains the inventory domain
//! model as pure types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kardex Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard Frontend (browser)                   │   │
//! │  │    Product List ──► Restock Form ──► Analytics Charts          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (Axum)                           │   │
//! │  │    GET /api/products, POST /api/products/{id}/restock, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        kardex-sync (query cache + invalidation table)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        kardex-store (authoritative in-memory store)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kardex-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐   ┌────────────┐   ┌───────────┐               │   │
//! │  │   │   types   │   │ validation │   │   error   │               │   │
//! │  │   │  Product  │   │   rules    │   │ taxonomy  │               │   │
//! │  │   │  Restock  │   │   checks   │   │  (typed)  │               │   │
//! │  │   └───────────┘   └────────────┘   └───────────┘               │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, RestockLogEntry, projections)
//! - [`projections`] - Pure computation of the derived read models
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network and file system access is FORBIDDEN here
//! 3. **Integer Money**: Prices are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod projections;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kardex_core::Product` instead of
// `use kardex_core::types::Product`

pub use error::{CoreError, CoreResult, ValidationError};
pub use projections::DEFAULT_RECENT_RESTOCKS;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default low-stock threshold applied when a product is created without one.
///
/// ## Why a constant?
/// The threshold is stored per product so it can be tuned individually,
/// but every product starts from the same default.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum quantity accepted by a single restock operation.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 10).
/// Can be made configurable per deployment in future versions.
pub const MAX_RESTOCK_QUANTITY: i64 = 9_999;
