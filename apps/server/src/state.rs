//! Shared application state and startup seeding.

use std::sync::Arc;

use tracing::{info, warn};

use kardex_core::ProductDraft;
use kardex_store::InventoryStore;
use kardex_sync::QueryClient;

use crate::config::KardexConfig;

/// State shared by every request handler.
pub struct AppState {
    /// The synchronization layer over the inventory store. All reads go
    /// through its cache; all writes go through its invalidation table.
    pub client: QueryClient,
}

impl AppState {
    /// Builds the store and query client from configuration.
    pub fn new(config: &KardexConfig) -> Arc<Self> {
        let store = Arc::new(InventoryStore::new());
        let client = QueryClient::new(store).with_recent_limit(config.inventory.recent_limit);
        Arc::new(AppState { client })
    }

    /// Inserts the sample catalog. Skipped silently per product on
    /// conflict so repeated startups against pre-seeded state stay quiet.
    pub async fn seed_demo(&self) {
        let catalog = vec![
            ProductDraft {
                id: "p-1001".to_string(),
                name: "Thermal Receipt Paper 80mm".to_string(),
                sku: "PAP-80MM".to_string(),
                price_cents: 499,
                stock: 42,
                low_stock_threshold: Some(10),
            },
            ProductDraft {
                id: "p-1002".to_string(),
                name: "Barcode Scanner Stand".to_string(),
                sku: "SCN-STD-01".to_string(),
                price_cents: 2350,
                stock: 7,
                low_stock_threshold: Some(10),
            },
            ProductDraft {
                id: "p-1003".to_string(),
                name: "Cash Drawer Insert".to_string(),
                sku: "DRW-INS-5B".to_string(),
                price_cents: 1899,
                stock: 0,
                low_stock_threshold: Some(5),
            },
        ];

        let mut seeded = 0usize;
        for draft in catalog {
            let id = draft.id.clone();
            match self.client.create_product(draft).await {
                Ok(_) => seeded += 1,
                Err(e) => warn!(product_id = %id, error = %e, "Skipping demo product"),
            }
        }
        info!(seeded, "Demo catalog ready");
    }
}
