//! Shared helpers for the in-crate test suites.

use crate::pool::{Database, DbConfig};
use crate::repository::product::NewProduct;
use tally_core::{CheckoutItem, CheckoutRequest, Product, Role, User};

/// Fresh in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Product input with sensible defaults for tests.
pub fn new_product(sku: &str, quantity: i64, min_stock: i64) -> NewProduct {
    NewProduct {
        name: format!("Test {sku}"),
        sku: sku.to_string(),
        category: "general".to_string(),
        brand: String::new(),
        purchase_price_cents: 800,
        selling_price_cents: 1000,
        quantity,
        min_stock: Some(min_stock),
    }
}

/// Inserts and returns a product.
pub async fn seed_product(db: &Database, sku: &str, quantity: i64, min_stock: i64) -> Product {
    db.products()
        .insert(&new_product(sku, quantity, min_stock))
        .await
        .expect("seed product")
}

/// Inserts and returns a user with the given role.
pub async fn seed_user(db: &Database, role: Role) -> User {
    db.users().insert("Test Operator", role).await.expect("seed user")
}

/// Checkout request at catalog price for the given (product, quantity)
/// lines, with totals computed the way a client would.
pub fn checkout_request(lines: Vec<(&Product, i64)>) -> CheckoutRequest {
    let items: Vec<CheckoutItem> = lines
        .iter()
        .map(|(product, quantity)| CheckoutItem {
            product_id: product.id.clone(),
            quantity: *quantity,
            price_cents: product.selling_price_cents,
            total_cents: None,
        })
        .collect();
    let subtotal: i64 = items.iter().map(CheckoutItem::line_total_cents).sum();

    CheckoutRequest {
        items,
        customer_name: None,
        payment_method: None,
        subtotal_cents: Some(subtotal),
        tax_cents: Some(0),
        discount_cents: Some(0),
        grand_total_cents: Some(subtotal),
    }
}
