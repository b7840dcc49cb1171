//! Reporting endpoints.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;
use tally_db::SalesSummary;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Window start (RFC 3339). Default: 30 days ago.
    pub from: Option<DateTime<Utc>>,
    /// Window end, exclusive (RFC 3339). Default: now.
    pub to: Option<DateTime<Utc>>,
}

/// `GET /api/reports/summary` - aggregated sale figures for a window.
pub async fn sales_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SalesSummary>, ApiError> {
    let to = query.to.unwrap_or_else(Utc::now);
    let from = query.from.unwrap_or_else(|| to - Duration::days(30));

    if from >= to {
        return Err(ApiError::bad_request("from must be earlier than to"));
    }

    let summary = state.db.sales().summary(from, to).await?;
    Ok(Json(summary))
}
