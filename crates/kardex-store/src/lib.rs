//! # kardex-store: Authoritative In-Memory Store
//!
//! This crate owns the inventory state exclusively: an explicit
//! [`InventoryStore`] object constructed at process start, owned by the
//! serving component, and passed by handle to everything else. No other
//! part of the system holds mutable inventory state.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     InventoryStore Concurrency                          │
//! │                                                                         │
//! │  Reads  ──► RwLock::read()  ──► many may run concurrently               │
//! │                                                                         │
//! │  Writes ──► RwLock::write() ──► exclusive; a restock updates the        │
//! │                                 product AND appends its log entry       │
//! │                                 under one guard, so no reader ever      │
//! │                                 observes a partial write                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Not Durable - On Purpose
//! State lives in memory only and is lost on process restart. Callers must
//! not assume durability.

mod store;

pub use store::InventoryStore;
