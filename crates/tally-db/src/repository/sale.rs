//! # Sale Repository
//!
//! Checkout, void, and read operations for sales and sale items.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Checkout Lifecycle                         │
//! │                                                                 │
//! │  1. VALIDATE (before any transaction opens)                     │
//! │     └── items non-empty, quantities positive, grand total > 0   │
//! │                                                                 │
//! │  2. BEGIN TRANSACTION                                           │
//! │     └── insert sale header (invoice retry on collision)         │
//! │                                                                 │
//! │  3. PER ITEM, IN ORDER, SEQUENTIALLY                            │
//! │     ├── look up product        → ProductNotFound                │
//! │     ├── compare stock          → InsufficientStock              │
//! │     ├── insert sale_item row (price snapshot)                   │
//! │     └── ledger::apply_delta(-quantity)                          │
//! │                                                                 │
//! │  4. COMMIT (or explicit ROLLBACK on the first error)            │
//! │     └── all rows and all stock decrements exist, or none do     │
//! │                                                                 │
//! │  5. (OPTIONAL, ADMIN) VOID                                      │
//! │     └── restore stock, delete items + header, atomically        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are processed sequentially on purpose: a stock failure is
//! attributable to one specific item, and a later line item observes the
//! decrements of earlier lines in the same sale (two lines for the same
//! product cannot both pass the check against a stale quantity).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult, SaleError, SaleResult};
use crate::ledger;
use tally_core::{
    validation::validate_checkout, CheckoutRequest, CoreError, PaymentMethod, Sale, SaleItem,
    SaleReceipt, ValidationError, DEFAULT_CUSTOMER_NAME,
};

/// Columns selected for every sale-header read.
const SALE_COLUMNS: &str = r#"
    id, invoice_number, user_id, customer_name,
    subtotal_cents, tax_cents, discount_cents, grand_total_cents,
    payment_method, created_at
"#;

/// How many times a header insert is retried on an invoice-number
/// collision before giving up.
const INVOICE_RETRY_ATTEMPTS: u32 = 3;

/// Aggregated sale figures for a reporting window.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesSummary {
    pub total_sales: i64,
    pub revenue_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Checkout (the sale transaction processor)
    // =========================================================================

    /// Processes a checkout end to end as one atomic transaction.
    ///
    /// ## Guarantee
    /// On `Ok`, the sale header, every line item, and every stock
    /// decrement are durably committed. On `Err`, no state changed -
    /// the whole transaction is rolled back before the error surfaces.
    pub async fn checkout(
        &self,
        user_id: &str,
        request: &CheckoutRequest,
    ) -> SaleResult<SaleReceipt> {
        // Reject malformed payloads before touching the database.
        validate_checkout(request)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        match Self::checkout_in_tx(&mut tx, user_id, request).await {
            Ok(receipt) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

                info!(
                    sale_id = %receipt.sale_id,
                    invoice_number = %receipt.invoice_number,
                    items = receipt.items_count,
                    grand_total_cents = receipt.grand_total_cents,
                    "Sale committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed checkout also failed");
                }
                Err(err)
            }
        }
    }

    /// Body of the checkout transaction. Every statement here runs on the
    /// open transaction; the caller commits or rolls back.
    async fn checkout_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: &str,
        request: &CheckoutRequest,
    ) -> SaleResult<SaleReceipt> {
        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let customer_name = request
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_NAME);
        let payment_method = request.payment_method.unwrap_or_default();
        let grand_total_cents =
            request
                .grand_total_cents
                .ok_or_else(|| ValidationError::Required {
                    field: "grand_total".to_string(),
                })?;

        let invoice_number =
            Self::insert_header(tx, &sale_id, user_id, request, customer_name, payment_method, grand_total_cents, now)
                .await?;

        debug!(sale_id = %sale_id, invoice_number = %invoice_number, "Sale header inserted");

        for item in &request.items {
            // Look up the product first: a missing product must surface
            // as ProductNotFound, not as an FK violation on the item row.
            let available: Option<(String, i64)> =
                sqlx::query_as("SELECT name, quantity FROM products WHERE id = ?1")
                    .bind(&item.product_id)
                    .fetch_optional(&mut **tx)
                    .await?;

            let (product_name, available) = match available {
                Some(row) => row,
                None => return Err(SaleError::product_not_found(&item.product_id)),
            };

            if available < item.quantity {
                return Err(SaleError::Core(CoreError::InsufficientStock {
                    name: product_name,
                    available,
                    requested: item.quantity,
                }));
            }

            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, quantity, price_cents, total_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.price_cents)
            .bind(item.line_total_cents())
            .execute(&mut **tx)
            .await?;

            ledger::apply_delta(&mut *tx, &item.product_id, -item.quantity).await?;
        }

        Ok(SaleReceipt {
            sale_id,
            invoice_number,
            items_count: request.items.len(),
            grand_total_cents,
        })
    }

    /// Inserts the sale header, regenerating the invoice number on a
    /// unique-constraint collision. Returns the invoice number used.
    #[allow(clippy::too_many_arguments)]
    async fn insert_header(
        tx: &mut Transaction<'_, Sqlite>,
        sale_id: &str,
        user_id: &str,
        request: &CheckoutRequest,
        customer_name: &str,
        payment_method: PaymentMethod,
        grand_total_cents: i64,
        now: DateTime<Utc>,
    ) -> SaleResult<String> {
        let mut attempts = 0;
        loop {
            let invoice_number = generate_invoice_number();

            let result = sqlx::query(
                r#"
                INSERT INTO sales (
                    id, invoice_number, user_id, customer_name,
                    subtotal_cents, tax_cents, discount_cents, grand_total_cents,
                    payment_method, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(sale_id)
            .bind(&invoice_number)
            .bind(user_id)
            .bind(customer_name)
            .bind(request.subtotal_cents.unwrap_or(0))
            .bind(request.tax_cents.unwrap_or(0))
            .bind(request.discount_cents.unwrap_or(0))
            .bind(grand_total_cents)
            .bind(payment_method)
            .bind(now)
            .execute(&mut **tx)
            .await;

            match result {
                Ok(_) => return Ok(invoice_number),
                Err(err) => {
                    let db_err = DbError::from(err);
                    attempts += 1;
                    if db_err.is_unique_violation() && attempts < INVOICE_RETRY_ATTEMPTS {
                        warn!(attempts, "Invoice number collision, regenerating");
                        continue;
                    }
                    return Err(db_err.into());
                }
            }
        }
    }

    // =========================================================================
    // Void (reverses a committed sale)
    // =========================================================================

    /// Voids a committed sale: restores stock for every line item and
    /// hard-deletes the sale with its items, atomically.
    ///
    /// Callers needing an audit trail must capture pre-void state
    /// themselves.
    pub async fn void_sale(&self, sale_id: &str) -> SaleResult<()> {
        let items: Vec<(String, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM sale_items WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        match Self::void_in_tx(&mut tx, sale_id, &items).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

                info!(sale_id = %sale_id, restored_items = items.len(), "Sale voided");
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed void also failed");
                }
                Err(err)
            }
        }
    }

    async fn void_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        sale_id: &str,
        items: &[(String, i64)],
    ) -> SaleResult<()> {
        // Positive deltas: restores cannot fail the stock check.
        for (product_id, quantity) in items {
            ledger::apply_delta(&mut *tx, product_id, *quantity).await?;
        }

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut **tx)
            .await?;

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SaleError::sale_not_found(sale_id));
        }

        Ok(())
    }

    // =========================================================================
    // Reads (no transaction wrapping required)
    // =========================================================================

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, price_cents, total_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the most recent sales.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Aggregated figures for sales created in `[from, to)`.
    pub async fn summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        let summary = sqlx::query_as::<_, SalesSummary>(
            r#"
            SELECT
                COUNT(*) AS total_sales,
                COALESCE(SUM(grand_total_cents), 0) AS revenue_cents,
                COALESCE(SUM(tax_cents), 0) AS tax_cents,
                COALESCE(SUM(discount_cents), 0) AS discount_cents
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}

/// Generates an invoice number: timestamp plus a random suffix.
///
/// Uniqueness is not cryptographically guaranteed; the UNIQUE constraint
/// on `sales.invoice_number` plus the bounded retry in `insert_header`
/// covers the negligible collision window.
///
/// ## Example
/// `INV-260828143205-4817`
fn generate_invoice_number() -> String {
    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let random = nanos % 10000;
    format!("INV-{}-{:04}", now.format("%y%m%d%H%M%S"), random)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{checkout_request, seed_product, seed_user, test_db};
    use tally_core::{CheckoutItem, Role, StockStatus};

    #[tokio::test]
    async fn invoice_number_has_expected_shape() {
        let invoice = generate_invoice_number();
        assert!(invoice.starts_with("INV-"));
        // INV- + 12 digit timestamp + - + 4 digit suffix
        assert_eq!(invoice.len(), 4 + 12 + 1 + 4);
    }

    #[tokio::test]
    async fn checkout_commits_sale_items_and_stock() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "COKE-330", 10, 2).await;

        let request = checkout_request(vec![(&product, 3)]);
        let receipt = db.sales().checkout(&user.id, &request).await.unwrap();

        assert_eq!(receipt.items_count, 1);
        assert!(receipt.invoice_number.starts_with("INV-"));

        let sale = db.sales().get_by_id(&receipt.sale_id).await.unwrap().unwrap();
        assert_eq!(sale.user_id.as_deref(), Some(user.id.as_str()));
        assert_eq!(sale.customer_name, "Walk-in Customer");
        assert_eq!(sale.payment_method, PaymentMethod::Cash);

        let items = db.sales().get_items(&receipt.sale_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].price_cents, product.selling_price_cents);
        assert_eq!(items[0].total_cents, 3 * product.selling_price_cents);

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 7);
        assert_eq!(stored.status, StockStatus::InStock);
    }

    #[tokio::test]
    async fn empty_items_fails_before_any_write() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;

        let request = CheckoutRequest {
            items: vec![],
            grand_total_cents: Some(100),
            ..CheckoutRequest::default()
        };
        let err = db.sales().checkout(&user.id, &request).await.unwrap_err();
        assert!(matches!(
            err,
            SaleError::Core(CoreError::Validation(ValidationError::EmptyList { .. }))
        ));

        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_grand_total_rejected() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "TEA-1", 5, 2).await;

        let mut request = checkout_request(vec![(&product, 1)]);
        request.grand_total_cents = None;

        let err = db.sales().checkout(&user.id, &request).await.unwrap_err();
        assert!(matches!(
            err,
            SaleError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn unknown_product_rolls_back_everything() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "JUICE-1", 10, 2).await;

        let mut request = checkout_request(vec![(&product, 2)]);
        request.items.push(CheckoutItem {
            product_id: "ghost".to_string(),
            quantity: 1,
            price_cents: 100,
            total_cents: None,
        });

        let err = db.sales().checkout(&user.id, &request).await.unwrap_err();
        assert!(matches!(
            err,
            SaleError::Core(CoreError::ProductNotFound(ref id)) if id == "ghost"
        ));

        // Item 1 was processed before the failure; none of it survives.
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 10);
    }

    #[tokio::test]
    async fn sell_down_scenario() {
        // product A: quantity=5, min_stock=2
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "A-1", 5, 2).await;

        // Sell 3 → stock 2, low_stock.
        db.sales()
            .checkout(&user.id, &checkout_request(vec![(&product, 3)]))
            .await
            .unwrap();
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 2);
        assert_eq!(stored.status, StockStatus::LowStock);

        // Sell 2 more → stock 0, out_of_stock.
        db.sales()
            .checkout(&user.id, &checkout_request(vec![(&product, 2)]))
            .await
            .unwrap();
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 0);
        assert_eq!(stored.status, StockStatus::OutOfStock);

        // Further sale of 1 fails with available 0, requested 1.
        let err = db
            .sales()
            .checkout(&user.id, &checkout_request(vec![(&product, 1)]))
            .await
            .unwrap_err();
        match err {
            SaleError::Core(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_failing_checkout_is_idempotent() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "B-1", 2, 2).await;

        let request = checkout_request(vec![(&product, 5)]);
        for _ in 0..2 {
            let err = db.sales().checkout(&user.id, &request).await.unwrap_err();
            assert!(matches!(
                err,
                SaleError::Core(CoreError::InsufficientStock { .. })
            ));
        }

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 2);
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_product_twice_sees_earlier_decrement() {
        // Two lines for one product: 4 + 3 with only 5 in stock. Neither
        // line alone exceeds stock; the second must fail against the
        // already-decremented quantity and the whole sale rolls back.
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "C-1", 5, 2).await;

        let request = checkout_request(vec![(&product, 4), (&product, 3)]);
        let err = db.sales().checkout(&user.id, &request).await.unwrap_err();
        match err {
            SaleError::Core(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 1);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 5);
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn void_restores_pre_sale_state() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Admin).await;
        let a = seed_product(&db, "V-1", 8, 2).await;
        let b = seed_product(&db, "V-2", 4, 2).await;

        let receipt = db
            .sales()
            .checkout(&user.id, &checkout_request(vec![(&a, 5), (&b, 4)]))
            .await
            .unwrap();

        db.sales().void_sale(&receipt.sale_id).await.unwrap();

        // Stock exactly as before the sale, statuses re-derived.
        let a_stored = db.products().get_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(a_stored.quantity, 8);
        assert_eq!(a_stored.status, StockStatus::InStock);
        let b_stored = db.products().get_by_id(&b.id).await.unwrap().unwrap();
        assert_eq!(b_stored.quantity, 4);
        assert_eq!(b_stored.status, StockStatus::InStock);

        // Sale and items are gone.
        assert!(db.sales().get_by_id(&receipt.sale_id).await.unwrap().is_none());
        assert!(db.sales().get_items(&receipt.sale_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn void_unknown_sale_fails() {
        let db = test_db().await;
        let err = db.sales().void_sale("missing").await.unwrap_err();
        assert!(matches!(err, SaleError::Core(CoreError::SaleNotFound(_))));
    }

    #[tokio::test]
    async fn price_snapshot_survives_catalog_change() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "SNAP-1", 10, 2).await;

        let receipt = db
            .sales()
            .checkout(&user.id, &checkout_request(vec![(&product, 1)]))
            .await
            .unwrap();

        // Raise the catalog price afterwards.
        db.products()
            .update(
                &product.id,
                &crate::ProductUpdate {
                    name: product.name.clone(),
                    category: product.category.clone(),
                    brand: product.brand.clone(),
                    purchase_price_cents: product.purchase_price_cents,
                    selling_price_cents: product.selling_price_cents + 500,
                    quantity: 9,
                    min_stock: product.min_stock,
                },
            )
            .await
            .unwrap();

        let items = db.sales().get_items(&receipt.sale_id).await.unwrap();
        assert_eq!(items[0].price_cents, product.selling_price_cents);
    }

    #[tokio::test]
    async fn summary_aggregates_window() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "SUM-1", 50, 2).await;

        for _ in 0..3 {
            db.sales()
                .checkout(&user.id, &checkout_request(vec![(&product, 2)]))
                .await
                .unwrap();
        }

        let from = Utc::now() - chrono::Duration::hours(1);
        let to = Utc::now() + chrono::Duration::hours(1);
        let summary = db.sales().summary(from, to).await.unwrap();
        assert_eq!(summary.total_sales, 3);
        assert_eq!(summary.revenue_cents, 3 * 2 * product.selling_price_cents);
    }

    #[tokio::test]
    async fn referenced_product_cannot_be_deleted() {
        let db = test_db().await;
        let user = seed_user(&db, Role::Staff).await;
        let product = seed_product(&db, "FK-1", 10, 2).await;

        db.sales()
            .checkout(&user.id, &checkout_request(vec![(&product, 1)]))
            .await
            .unwrap();

        let err = db.products().delete(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
