//! # REST API Routes
//!
//! The HTTP surface consumed by the dashboard frontend.
//!
//! ## Endpoint Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          REST Endpoints                                 │
//! │                                                                         │
//! │  GET    /api/products               All products                        │
//! │  POST   /api/products               Create (201, field checks)          │
//! │  GET    /api/products/low-stock     stock <= threshold (inclusive)      │
//! │  GET    /api/products/{id}          One product (404 if absent)         │
//! │  PUT    /api/products/{id}          Partial update                      │
//! │  DELETE /api/products/{id}          Delete (204)                        │
//! │  POST   /api/products/{id}/restock  Add stock, returns updated product  │
//! │  GET    /api/restocks/recent        Newest log entries (?limit=n)       │
//! │  GET    /api/dashboard/summary      Aggregate counters                  │
//! │  GET    /api/analytics              Stock trends, all products          │
//! │  GET    /api/analytics/{id}         Stock trend, one product            │
//! │                                                                         │
//! │  Errors: {"error": "<message>"} with 400 or 404                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Create Field Checks
//! `id`, `name`, `sku`, `price`, `stock` are checked in that order and a
//! field counts as missing when absent OR empty-ish (null, `""`, `0`,
//! `false`). The first failing field wins: `{"error": "Missing field:
//! <name>"}`. A zero-priced or zero-stock product is therefore rejected
//! at the HTTP boundary even though the store itself accepts zero stock.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use kardex_core::{
    DashboardSummary, Product, ProductAnalytics, ProductDraft, ProductPatch, RestockLogEntry,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Required create fields, checked in declaration order.
const REQUIRED_PRODUCT_FIELDS: [&str; 5] = ["id", "name", "sku", "price", "stock"];

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/low-stock", get(low_stock_products))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/{id}/restock", post(restock_product))
        .route("/api/restocks/recent", get(recent_restocks))
        .route("/api/dashboard/summary", get(dashboard_summary))
        .route("/api/analytics", get(all_analytics))
        .route("/api/analytics/{id}", get(product_analytics))
        .with_state(state)
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    let outcome = state.client.products().await;
    debug!(source = ?outcome.source, count = outcome.value.len(), "GET /api/products");
    Json((*outcome.value).clone())
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    for field in REQUIRED_PRODUCT_FIELDS {
        if is_missing(body.get(field)) {
            return Err(ApiError::missing_field(field));
        }
    }

    let draft: ProductDraft = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid product payload: {}", e)))?;

    let product = state.client.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let outcome = state.client.product(&id).await;
    match outcome.value.as_ref() {
        Some(product) => Ok(Json(product.clone())),
        None => Err(ApiError::NotFound("Product not found".to_string())),
    }
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    let product = state.client.update_product(&id, patch).await?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.client.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn low_stock_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    let outcome = state.client.low_stock_products().await;
    Json((*outcome.value).clone())
}

// =============================================================================
// Restocking
// =============================================================================

#[derive(Debug, Deserialize)]
struct RestockRequest {
    quantity: Option<i64>,
}

/// Adds stock and returns the product as updated by the write. The
/// restock log entry itself is visible through `/api/restocks/recent`.
async fn restock_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RestockRequest>,
) -> Result<Json<Product>, ApiError> {
    let quantity = body
        .quantity
        .ok_or_else(|| ApiError::missing_field("quantity"))?;

    state.client.restock(&id, quantity).await?;

    // Read the store directly: the per-id cache key is deliberately NOT
    // part of the restock invalidation set.
    let product = state
        .client
        .store()
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<usize>,
}

async fn recent_restocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<RestockLogEntry>> {
    match query.limit {
        // An explicit limit bypasses the cache; only the default view is
        // a cached query key.
        Some(limit) => Json(state.client.store().recent_restocks(limit).await),
        None => {
            let outcome = state.client.recent_restocks().await;
            Json((*outcome.value).clone())
        }
    }
}

// =============================================================================
// Dashboard & Analytics
// =============================================================================

async fn dashboard_summary(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    let outcome = state.client.dashboard_summary().await;
    Json((*outcome.value).clone())
}

async fn all_analytics(State(state): State<Arc<AppState>>) -> Json<Vec<ProductAnalytics>> {
    let outcome = state.client.product_analytics().await;
    Json((*outcome.value).clone())
}

async fn product_analytics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductAnalytics>, ApiError> {
    let outcome = state.client.product_analytics_for(&id).await;
    match outcome.value.as_ref() {
        Some(analytics) => Ok(Json(analytics.clone())),
        None => Err(ApiError::NotFound("Product not found".to_string())),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Empty-ish check for required create fields. Mirrors the loose
/// truthiness the frontend applies: absent, null, `false`, `0`, and `""`
/// all count as missing.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !*b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KardexConfig;
    use serde_json::json;

    fn state() -> Arc<AppState> {
        AppState::new(&KardexConfig::default())
    }

    fn body(id: &str, stock: i64) -> Value {
        json!({
            "id": id,
            "name": format!("Product {}", id),
            "sku": format!("SKU-{}", id),
            "price": 250,
            "stock": stock,
            "lowStockThreshold": 5,
        })
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = state();
        let (status, Json(product)) =
            create_product(State(Arc::clone(&state)), Json(body("p1", 3)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product.id, "p1");

        let Json(products) = list_products(State(state)).await;
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_create_checks_fields_in_order() {
        let state = state();

        let err = create_product(State(Arc::clone(&state)), Json(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing field: id");

        let mut payload = body("p1", 3);
        payload["name"] = json!("");
        let err = create_product(State(Arc::clone(&state)), Json(payload))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing field: name");

        // Zero is empty-ish: a free product cannot be created.
        let mut payload = body("p1", 3);
        payload["price"] = json!(0);
        let err = create_product(State(Arc::clone(&state)), Json(payload))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing field: price");

        // Same for zero initial stock.
        let err = create_product(State(state), Json(body("p1", 0)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing field: stock");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("p1", 3)))
            .await
            .unwrap();

        let err = create_product(State(state), Json(body("p1", 9)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product with this ID already exists");
    }

    #[tokio::test]
    async fn test_get_product_404_when_absent() {
        let state = state();
        let err = get_product(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("p1", 3)))
            .await
            .unwrap();

        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let Json(updated) = update_product(
            State(Arc::clone(&state)),
            Path("p1".to_string()),
            Json(patch),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Renamed");

        let status = delete_product(State(Arc::clone(&state)), Path("p1".to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_product(State(state), Path("p1".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn test_restock_returns_updated_product() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("p1", 2)))
            .await
            .unwrap();

        let Json(product) = restock_product(
            State(Arc::clone(&state)),
            Path("p1".to_string()),
            Json(RestockRequest { quantity: Some(3) }),
        )
        .await
        .unwrap();
        assert_eq!(product.stock, 5);

        let Json(recent) = recent_restocks(
            State(state),
            Query(RecentQuery { limit: None }),
        )
        .await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].quantity, 3);
        assert_eq!(recent[0].previous_stock, 2);
    }

    #[tokio::test]
    async fn test_restock_requires_quantity() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("p1", 2)))
            .await
            .unwrap();

        let err = restock_product(
            State(Arc::clone(&state)),
            Path("p1".to_string()),
            Json(RestockRequest { quantity: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing field: quantity");

        let err = restock_product(
            State(state),
            Path("p1".to_string()),
            Json(RestockRequest { quantity: Some(0) }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "quantity must be a positive integer");
    }

    #[tokio::test]
    async fn test_low_stock_is_inclusive() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("at", 5)))
            .await
            .unwrap();
        create_product(State(Arc::clone(&state)), Json(body("above", 6)))
            .await
            .unwrap();

        let Json(low) = low_stock_products(State(state)).await;
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, "at");
    }

    #[tokio::test]
    async fn test_recent_restocks_respects_limit_param() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("p1", 2)))
            .await
            .unwrap();
        for _ in 0..3 {
            restock_product(
                State(Arc::clone(&state)),
                Path("p1".to_string()),
                Json(RestockRequest { quantity: Some(1) }),
            )
            .await
            .unwrap();
        }

        let Json(capped) = recent_restocks(
            State(Arc::clone(&state)),
            Query(RecentQuery { limit: Some(2) }),
        )
        .await;
        assert_eq!(capped.len(), 2);

        let Json(all) = recent_restocks(State(state), Query(RecentQuery { limit: None })).await;
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_and_analytics() {
        let state = state();
        create_product(State(Arc::clone(&state)), Json(body("p1", 2)))
            .await
            .unwrap();
        restock_product(
            State(Arc::clone(&state)),
            Path("p1".to_string()),
            Json(RestockRequest { quantity: Some(4) }),
        )
        .await
        .unwrap();

        let Json(summary) = dashboard_summary(State(Arc::clone(&state))).await;
        assert_eq!(summary.total_products, 1);
        assert_eq!(summary.total_restocks, 1);
        assert_eq!(summary.total_stock_units, 6);

        let Json(all) = all_analytics(State(Arc::clone(&state))).await;
        assert_eq!(all.len(), 1);

        let Json(one) = product_analytics(State(Arc::clone(&state)), Path("p1".to_string()))
            .await
            .unwrap();
        assert_eq!(one.current_stock, 6);

        let err = product_analytics(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn test_is_missing_truthiness() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&json!(null))));
        assert!(is_missing(Some(&json!(""))));
        assert!(is_missing(Some(&json!(0))));
        assert!(is_missing(Some(&json!(0.0))));
        assert!(is_missing(Some(&json!(false))));
        assert!(!is_missing(Some(&json!("x"))));
        assert!(!is_missing(Some(&json!(1))));
        assert!(!is_missing(Some(&json!(true))));
    }
}
