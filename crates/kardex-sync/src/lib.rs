//! # kardex-sync: Query Synchronization Layer for Kardex
//!
//! This crate keeps the dashboard's cached views consistent with the
//! inventory store. Reads go through typed cache slots with single-flight
//! fetching; writes go straight to the store and then invalidate exactly
//! the cached views they made stale.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Synchronization Layer                               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        QueryClient                               │  │
//! │  │                                                                  │  │
//! │  │  Typed reads + writes; applies the write -> invalidation table   │  │
//! │  └───────────────┬───────────────────────────────┬──────────────────┘  │
//! │                  │ reads                         │ writes              │
//! │                  ▼                               │                     │
//! │  ┌────────────────────────────────┐              │                     │
//! │  │          QueryCache            │              │                     │
//! │  │                                │              │                     │
//! │  │  One Slot<T> per QueryKey:     │              │                     │
//! │  │  products, lowStockProducts,   │              │                     │
//! │  │  product[id], recentRestocks,  │              │                     │
//! │  │  dashboardSummary, analytics   │              │                     │
//! │  └───────────────┬────────────────┘              │                     │
//! │                  │ miss                          │                     │
//! │                  ▼                               ▼                     │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      InventoryStore                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  GUARANTEES:                                                           │
//! │  • Single-flight: concurrent reads of one key share one fetch          │
//! │  • Epoch ordering: a fetch that started before an invalidation         │
//! │    never overwrites the cache after it                                 │
//! │  • No time-based expiry: values live until explicitly invalidated      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`key`] - Query keys, write operations, and the invalidation table
//! - [`slot`] - The memoized single-flight cache cell
//! - [`client`] - `QueryCache` and `QueryClient`

pub mod client;
pub mod key;
pub mod slot;

pub use client::{QueryCache, QueryClient};
pub use key::{QueryKey, WriteOp};
pub use slot::{QueryOutcome, QuerySource, Slot};
