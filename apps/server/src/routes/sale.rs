//! Sale endpoints: checkout, listing, void.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;
use tally_core::{CheckoutRequest, Sale, SaleItem};

/// Response body for a successful checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub invoice_number: String,
    pub sale_id: String,
    pub items_count: usize,
    pub grand_total: i64,
}

/// A sale header together with its line items.
#[derive(Debug, Serialize)]
pub struct SaleView {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

/// `POST /api/sales` - process a checkout.
pub async fn create_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let receipt = state.db.sales().checkout(&user.id, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            success: true,
            invoice_number: receipt.invoice_number,
            sale_id: receipt.sale_id,
            items_count: receipt.items_count,
            grand_total: receipt.grand_total_cents,
        }),
    ))
}

/// `GET /api/sales` - most recent sales with their items.
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SaleView>>, ApiError> {
    let limit = query.limit.unwrap_or(50).min(200);
    let sales = state.db.sales().list_recent(limit).await?;

    let mut views = Vec::with_capacity(sales.len());
    for sale in sales {
        let items = state.db.sales().get_items(&sale.id).await?;
        views.push(SaleView { sale, items });
    }

    Ok(Json(views))
}

/// `GET /api/sales/:id` - one sale with its items.
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaleView>, ApiError> {
    let sale = state
        .db
        .sales()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Sale not found: {id}")))?;
    let items = state.db.sales().get_items(&id).await?;

    Ok(Json(SaleView { sale, items }))
}

/// `DELETE /api/sales/:id` - void a committed sale. Admin only.
pub async fn void_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !user.role.is_admin() {
        return Err(ApiError::forbidden("Voiding a sale requires admin role"));
    }

    state.db.sales().void_sale(&id).await?;

    info!(sale_id = %id, admin = %user.id, "Sale voided via API");

    Ok(Json(json!({
        "success": true,
        "message": "Sale voided and stock restored",
    })))
}
