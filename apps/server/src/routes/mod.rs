//! HTTP route definitions.
//!
//! ## Route Map
//! ```text
//! GET    /health                       liveness + db check   (open)
//!
//! POST   /api/sales                    checkout → 201        (any role)
//! GET    /api/sales                    recent sales + items  (any role)
//! GET    /api/sales/:id                one sale + items      (any role)
//! DELETE /api/sales/:id                void sale             (admin only)
//!
//! GET    /api/products                 list / search         (any role)
//! GET    /api/products/low-stock       reorder screen        (any role)
//! GET    /api/products/:id             one product           (any role)
//! POST   /api/products                 create → 201          (any role)
//! PUT    /api/products/:id             update                (any role)
//! POST   /api/products/:id/restock     manual restock        (any role)
//! DELETE /api/products/:id             delete                (admin only)
//!
//! GET    /api/reports/summary          sales aggregates      (any role)
//! ```
//!
//! Everything under `/api` passes through the bearer-token middleware.

pub mod product;
pub mod report;
pub mod sale;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{extract::State, middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::AppState;

/// Builds the complete application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/sales", post(sale::create_sale).get(sale::list_sales))
        .route("/sales/:id", get(sale::get_sale).delete(sale::void_sale))
        .route(
            "/products",
            post(product::create_product).get(product::list_products),
        )
        .route("/products/low-stock", get(product::list_low_stock))
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route("/products/:id/restock", post(product::restock_product))
        .route("/reports/summary", get(report::sales_summary))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe with a database round trip.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded" })),
        )
    }
}
