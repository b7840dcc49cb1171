//! # Inventory Ledger
//!
//! The single unit through which product stock is mutated. Both the
//! checkout transaction (negative deltas) and the void/restock flows
//! (positive deltas) go through [`apply_delta`]; nothing else writes
//! `products.quantity`.
//!
//! ## Stock Mutation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      apply_delta(id, -3)                        │
//! │                                                                 │
//! │  SELECT name, quantity, min_stock  ── within caller's tx        │
//! │       │                                                         │
//! │       ├── no row?            → ProductNotFound                  │
//! │       │                                                         │
//! │       ├── quantity + delta < 0 → InsufficientStock              │
//! │       │                          {name, available, requested}   │
//! │       ▼                                                         │
//! │  UPDATE quantity, status, updated_at                            │
//! │        WHERE id = ? AND quantity = <observed>                   │
//! │       │                                                         │
//! │       ├── 0 rows? → concurrent writer won; TransactionFailed    │
//! │       ▼                                                         │
//! │  StockLevel { quantity, status }                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional `WHERE quantity = <observed>` guard re-verifies the
//! read-then-write step, so even under weaker isolation a lost update
//! cannot drive stock negative or skip the status recompute.
//!
//! The ledger never commits: the caller owns the transaction boundary.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, SaleError, SaleResult};
use tally_core::{CoreError, StockStatus, ValidationError};

/// Updated stock fields returned from a successful delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub min_stock: i64,
    pub status: StockStatus,
}

/// Applies an atomic quantity delta to a product row and recomputes its
/// derived status.
///
/// Runs on the caller's connection, which is expected to be inside an
/// open transaction for sale processing (a bare connection is fine for
/// standalone restocks; SQLite then auto-commits the single statement).
///
/// ## Errors
/// - [`CoreError::ProductNotFound`] if no such product exists
/// - [`CoreError::InsufficientStock`] if `delta < 0` would drive the
///   quantity negative, checked against the transaction-consistent value
/// - [`DbError::TransactionFailed`] if the conditional update hit a
///   concurrent modification
pub async fn apply_delta(
    conn: &mut SqliteConnection,
    product_id: &str,
    delta: i64,
) -> SaleResult<StockLevel> {
    let row: Option<(String, i64, i64)> = sqlx::query_as(
        r#"
        SELECT name, quantity, min_stock
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let (name, quantity, min_stock) = match row {
        Some(row) => row,
        None => return Err(SaleError::product_not_found(product_id)),
    };

    // Checked add: an absurd delta (e.g. a bulk-restock typo near i64::MAX)
    // must surface as an error, not an arithmetic panic.
    let new_quantity = quantity.checked_add(delta).ok_or_else(|| {
        SaleError::from(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        })
    })?;
    if new_quantity < 0 {
        return Err(SaleError::Core(CoreError::InsufficientStock {
            name,
            available: quantity,
            requested: -delta,
        }));
    }

    let status = StockStatus::derive(new_quantity, min_stock);
    let now = Utc::now();

    debug!(
        product_id = %product_id,
        delta = %delta,
        new_quantity = %new_quantity,
        ?status,
        "Applying stock delta"
    );

    // Guard on the quantity we just observed: if another writer slipped
    // in between the read and this write, rows_affected is 0 and the
    // caller's transaction aborts instead of committing a lost update.
    let result = sqlx::query(
        r#"
        UPDATE products SET
            quantity = ?3,
            status = ?4,
            updated_at = ?5
        WHERE id = ?1 AND quantity = ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(new_quantity)
    .bind(status)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(SaleError::Db(DbError::TransactionFailed(format!(
            "concurrent stock update on product {product_id}"
        ))));
    }

    Ok(StockLevel {
        product_id: product_id.to_string(),
        name,
        quantity: new_quantity,
        min_stock,
        status,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
