//! Product catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;
use tally_core::validation::{validate_product_name, validate_sku};
use tally_core::{CoreError, Product, StockStatus};
use tally_db::{NewProduct, ProductUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i64,
    #[serde(default)]
    pub min_stock: Option<i64>,
}

/// Request body for updating a product. Status is derived, not accepted.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i64,
    pub min_stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub amount: i64,
}

/// Response body for a restock.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockResponse {
    pub success: bool,
    pub quantity: i64,
    pub status: StockStatus,
}

/// `GET /api/products` - list with optional category filter and search.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let limit = query.limit.unwrap_or(50).min(500);
    let products = state
        .db
        .products()
        .list(query.category.as_deref(), query.search.as_deref(), limit)
        .await?;

    Ok(Json(products))
}

/// `GET /api/products/low-stock` - products at or below their threshold.
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list_low_stock().await?;
    Ok(Json(products))
}

/// `GET /api/products/:id` - one product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(CoreError::ProductNotFound(id)))?;

    Ok(Json(product))
}

/// `POST /api/products` - create a product.
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_product_name(&request.name).map_err(CoreError::from)?;
    validate_sku(&request.sku).map_err(CoreError::from)?;
    if request.quantity < 0 || request.selling_price_cents < 0 || request.purchase_price_cents < 0 {
        return Err(ApiError::bad_request(
            "quantity and prices must be non-negative",
        ));
    }

    let new = NewProduct {
        name: request.name,
        sku: request.sku,
        category: request.category.unwrap_or_else(|| "general".to_string()),
        brand: request.brand.unwrap_or_default(),
        purchase_price_cents: request.purchase_price_cents,
        selling_price_cents: request.selling_price_cents,
        quantity: request.quantity,
        min_stock: request.min_stock,
    };

    let product = state.db.products().insert(&new).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/:id` - update a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validate_product_name(&request.name).map_err(CoreError::from)?;
    if request.quantity < 0 || request.min_stock < 0 {
        return Err(ApiError::bad_request(
            "quantity and min_stock must be non-negative",
        ));
    }

    let update = ProductUpdate {
        name: request.name,
        category: request.category,
        brand: request.brand,
        purchase_price_cents: request.purchase_price_cents,
        selling_price_cents: request.selling_price_cents,
        quantity: request.quantity,
        min_stock: request.min_stock,
    };

    let product = state.db.products().update(&id, &update).await?;
    Ok(Json(product))
}

/// `POST /api/products/:id/restock` - add stock through the ledger.
pub async fn restock_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RestockRequest>,
) -> Result<Json<RestockResponse>, ApiError> {
    let level = state.db.products().restock(&id, request.amount).await?;

    Ok(Json(RestockResponse {
        success: true,
        quantity: level.quantity,
        status: level.status,
    }))
}

/// `DELETE /api/products/:id` - delete a product. Admin only; products
/// referenced by sales are protected by the database and surface as 409.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !user.role.is_admin() {
        return Err(ApiError::forbidden("Deleting a product requires admin role"));
    }

    state.db.products().delete(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted",
    })))
}
