//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD with the stock status always derived, never caller-set
//! - Manual restock through the inventory ledger
//! - Low-stock listing for reorder screens
//!
//! ## Derived Status
//! Every write path recomputes `status` from `(quantity, min_stock)` via
//! [`StockStatus::derive`]. There is no code path that accepts a status
//! from outside.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, SaleResult};
use crate::ledger::{self, StockLevel};
use tally_core::{Product, StockStatus, ValidationError, DEFAULT_MIN_STOCK};

/// Columns selected for every product read.
const PRODUCT_COLUMNS: &str = r#"
    id, name, sku, category, brand,
    purchase_price_cents, selling_price_cents,
    quantity, min_stock, status,
    created_at, updated_at
"#;

/// Input for creating a product. Status and timestamps are derived.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub brand: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i64,
    /// Reorder threshold; defaults to [`DEFAULT_MIN_STOCK`] when absent.
    pub min_stock: Option<i64>,
}

/// Input for updating a product. Stock status is re-derived from the new
/// quantity/threshold; it cannot be set directly.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i64,
    pub min_stock: i64,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU (e.g., "COKE-330").
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, optionally filtered by category and a name/SKU
    /// search term, sorted by name.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        limit: u32,
    ) -> DbResult<Vec<Product>> {
        debug!(?category, ?search, limit, "Listing products");

        // Empty filters match everything; LIKE is fine at single-store
        // catalog sizes.
        let pattern = format!("%{}%", search.unwrap_or("").trim());

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE (?1 IS NULL OR category = ?1)
              AND (name LIKE ?2 OR sku LIKE ?2)
            ORDER BY name
            LIMIT ?3
            "#
        ))
        .bind(category)
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products at or below their reorder threshold (low or out of
    /// stock), most urgent first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE quantity <= min_stock
            ORDER BY quantity ASC, name
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the stored product with derived status
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(sku = %new.sku, "Inserting product");

        let now = Utc::now();
        let min_stock = new.min_stock.unwrap_or(DEFAULT_MIN_STOCK);
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            sku: new.sku.trim().to_string(),
            category: new.category.clone(),
            brand: new.brand.clone(),
            purchase_price_cents: new.purchase_price_cents,
            selling_price_cents: new.selling_price_cents,
            quantity: new.quantity,
            min_stock,
            status: StockStatus::derive(new.quantity, min_stock),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, category, brand,
                purchase_price_cents, selling_price_cents,
                quantity, min_stock, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(product.purchase_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.quantity)
        .bind(product.min_stock)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates an existing product, re-deriving the stock status.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the updated product
    /// * `Err(DbError::NotFound)` - product doesn't exist
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();
        let status = StockStatus::derive(update.quantity, update.min_stock);

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                brand = ?4,
                purchase_price_cents = ?5,
                selling_price_cents = ?6,
                quantity = ?7,
                min_stock = ?8,
                status = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(&update.category)
        .bind(&update.brand)
        .bind(update.purchase_price_cents)
        .bind(update.selling_price_cents)
        .bind(update.quantity)
        .bind(update.min_stock)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Manually restocks a product (positive delta through the ledger,
    /// status re-derived).
    pub async fn restock(&self, id: &str, amount: i64) -> SaleResult<StockLevel> {
        if amount <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "restock amount".to_string(),
            }
            .into());
        }

        debug!(id = %id, amount = %amount, "Restocking product");

        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        ledger::apply_delta(&mut *conn, id, amount).await
    }

    /// Deletes a product.
    ///
    /// Products referenced by any sale item are protected by the
    /// RESTRICT foreign key and surface as `ForeignKeyViolation`.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{new_product, test_db};
    use crate::SaleError;
    use tally_core::CoreError;

    #[tokio::test]
    async fn insert_derives_status() {
        let db = test_db().await;
        let repo = db.products();

        let healthy = repo.insert(&new_product("SODA-1", 20, 5)).await.unwrap();
        assert_eq!(healthy.status, StockStatus::InStock);

        let low = repo.insert(&new_product("SODA-2", 3, 5)).await.unwrap();
        assert_eq!(low.status, StockStatus::LowStock);

        let empty = repo.insert(&new_product("SODA-3", 0, 5)).await.unwrap();
        assert_eq!(empty.status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn duplicate_sku_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("DUP-1", 5, 5)).await.unwrap();
        let err = repo.insert(&new_product("DUP-1", 5, 5)).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn update_rederives_status() {
        let db = test_db().await;
        let repo = db.products();
        let product = repo.insert(&new_product("CHIPS-1", 20, 5)).await.unwrap();

        let updated = repo
            .update(
                &product.id,
                &ProductUpdate {
                    name: product.name.clone(),
                    category: product.category.clone(),
                    brand: product.brand.clone(),
                    purchase_price_cents: product.purchase_price_cents,
                    selling_price_cents: product.selling_price_cents,
                    quantity: 2,
                    min_stock: 5,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity, 2);
        assert_eq!(updated.status, StockStatus::LowStock);
    }

    #[tokio::test]
    async fn restock_transitions_status() {
        let db = test_db().await;
        let repo = db.products();
        let product = repo.insert(&new_product("MILK-1", 0, 5)).await.unwrap();
        assert_eq!(product.status, StockStatus::OutOfStock);

        let level = repo.restock(&product.id, 12).await.unwrap();
        assert_eq!(level.quantity, 12);
        assert_eq!(level.status, StockStatus::InStock);
    }

    #[tokio::test]
    async fn restock_rejects_non_positive_amount() {
        let db = test_db().await;
        let repo = db.products();
        let product = repo.insert(&new_product("MILK-2", 5, 5)).await.unwrap();

        let err = repo.restock(&product.id, 0).await.unwrap_err();
        assert!(matches!(err, SaleError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn restock_rejects_overflowing_amount() {
        let db = test_db().await;
        let repo = db.products();
        let product = repo.insert(&new_product("MILK-3", 5, 5)).await.unwrap();

        let err = repo.restock(&product.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, SaleError::Core(CoreError::Validation(_))));

        let stored = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 5);
    }

    #[tokio::test]
    async fn list_filters_by_category_and_search() {
        let db = test_db().await;
        let repo = db.products();

        let mut bev = new_product("BEV-1", 5, 5);
        bev.category = "beverages".to_string();
        bev.name = "Cola".to_string();
        repo.insert(&bev).await.unwrap();

        let mut snack = new_product("SNK-1", 5, 5);
        snack.category = "snacks".to_string();
        snack.name = "Pretzels".to_string();
        repo.insert(&snack).await.unwrap();

        let all = repo.list(None, None, 50).await.unwrap();
        assert_eq!(all.len(), 2);

        let beverages = repo.list(Some("beverages"), None, 50).await.unwrap();
        assert_eq!(beverages.len(), 1);
        assert_eq!(beverages[0].name, "Cola");

        let by_name = repo.list(None, Some("pretz"), 50).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].sku, "SNK-1");
    }

    #[tokio::test]
    async fn low_stock_listing() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("OK-1", 50, 5)).await.unwrap();
        repo.insert(&new_product("LOW-1", 2, 5)).await.unwrap();
        repo.insert(&new_product("OUT-1", 0, 5)).await.unwrap();

        let low = repo.list_low_stock().await.unwrap();
        let skus: Vec<_> = low.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["OUT-1", "LOW-1"]);
    }

    #[tokio::test]
    async fn delete_missing_product_fails() {
        let db = test_db().await;
        let err = db.products().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
