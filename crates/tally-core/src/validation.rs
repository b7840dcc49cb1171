//! # Validation Module
//!
//! Input validation for checkout payloads and catalog writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                          │
//! │                                                                 │
//! │  Layer 1: HTTP boundary (serde)                                 │
//! │  └── Type validation (deserialization)                          │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: THIS MODULE                                           │
//! │  └── Business rule validation, BEFORE any transaction opens     │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 3: Database (SQLite)                                     │
//! │  ├── NOT NULL / CHECK constraints                               │
//! │  ├── UNIQUE constraints                                         │
//! │  └── Foreign key constraints                                    │
//! │                                                                 │
//! │  Defense in depth: multiple layers catch different errors       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CheckoutRequest;
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Checkout Validation
// =============================================================================

/// Validates a checkout payload before any transaction opens.
///
/// ## Rules
/// - `items` must be non-empty (and bounded by [`MAX_SALE_ITEMS`])
/// - every item must name a product and carry a positive quantity
/// - unit prices must be non-negative
/// - `grand_total_cents` must be present and positive
///
/// A payload that passes here can still fail inside the transaction
/// (unknown product, insufficient stock) - those checks need the
/// transaction-consistent catalog state.
pub fn validate_checkout(request: &CheckoutRequest) -> ValidationResult<()> {
    if request.items.is_empty() {
        return Err(ValidationError::EmptyList {
            field: "items".to_string(),
        });
    }

    if request.items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_ITEMS as i64,
        });
    }

    for item in &request.items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
        validate_price_cents(item.price_cents)?;
    }

    match request.grand_total_cents {
        None => Err(ValidationError::Required {
            field: "grand_total".to_string(),
        }),
        Some(total) if total <= 0 => Err(ValidationError::MustBePositive {
            field: "grand_total".to_string(),
        }),
        Some(_) => Ok(()),
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional/free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Alphanumeric, hyphens and underscores only
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckoutItem;

    fn item(product_id: &str, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            product_id: product_id.to_string(),
            quantity,
            price_cents: 199,
            total_cents: None,
        }
    }

    fn request(items: Vec<CheckoutItem>, grand_total: Option<i64>) -> CheckoutRequest {
        CheckoutRequest {
            items,
            grand_total_cents: grand_total,
            ..CheckoutRequest::default()
        }
    }

    #[test]
    fn empty_items_rejected() {
        let err = validate_checkout(&request(vec![], Some(100))).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyList { .. }));
    }

    #[test]
    fn missing_grand_total_rejected() {
        let err = validate_checkout(&request(vec![item("p1", 1)], None)).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn zero_grand_total_rejected() {
        let err = validate_checkout(&request(vec![item("p1", 1)], Some(0))).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));
    }

    #[test]
    fn non_positive_quantity_rejected() {
        let err = validate_checkout(&request(vec![item("p1", 0)], Some(100))).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));

        let err = validate_checkout(&request(vec![item("p1", -3)], Some(100))).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));
    }

    #[test]
    fn blank_product_id_rejected() {
        let err = validate_checkout(&request(vec![item("  ", 1)], Some(100))).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn well_formed_checkout_passes() {
        assert!(validate_checkout(&request(vec![item("p1", 2), item("p2", 1)], Some(597))).is_ok());
    }

    #[test]
    fn validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn validate_price_allows_zero() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn validate_sku_rules() {
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("product_1").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn validate_product_name_rules() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }
}
