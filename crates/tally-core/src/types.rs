//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐     │
//! │  │    Product    │   │     Sale      │   │   SaleItem    │     │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │     │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)    │     │
//! │  │  sku (unique) │   │  invoice_no   │   │  sale_id (FK) │     │
//! │  │  quantity     │   │  grand_total  │   │  product_id   │     │
//! │  │  status*      │   │  payment      │   │  price (snap) │     │
//! │  └───────────────┘   └───────────────┘   └───────────────┘     │
//! │                                                                 │
//! │  * status is DERIVED from (quantity, min_stock) and is never    │
//! │    settable on its own.                                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, invoice_number) - human-readable, shown to users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Stock Status
// =============================================================================

/// Derived reorder-urgency classification of a product.
///
/// ## Invariant
/// After any stock mutation, `product.status == StockStatus::derive(quantity,
/// min_stock)` holds. Both the inventory ledger and the product editor call
/// [`StockStatus::derive`] rather than duplicating the threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Quantity is comfortably above the reorder threshold.
    InStock,
    /// Quantity is positive but at or below `min_stock`.
    LowStock,
    /// Quantity is zero.
    OutOfStock,
}

impl StockStatus {
    /// Derives the status from a quantity and reorder threshold.
    ///
    /// Pure and total: no side effects, no failure cases.
    ///
    /// ## Rule
    /// - `OutOfStock` iff quantity = 0
    /// - `LowStock` iff 0 < quantity <= min_stock
    /// - `InStock` otherwise
    #[inline]
    pub const fn derive(quantity: i64, min_stock: i64) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity <= min_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its current stock level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on receipts and stock errors.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique per catalog.
    pub sku: String,

    /// Category for catalog filtering.
    pub category: String,

    /// Brand label (may be empty).
    pub brand: String,

    /// Acquisition price in cents.
    pub purchase_price_cents: i64,

    /// Selling price in cents (smallest currency unit).
    pub selling_price_cents: i64,

    /// Current stock level. Never negative.
    pub quantity: i64,

    /// Reorder threshold used to derive `status`.
    pub min_stock: i64,

    /// Derived stock status. Read-only outside the ledger/editor.
    pub status: StockStatus,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last modified (stock changes included).
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Online/remote payment.
    Online,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale header.
///
/// Immutable once committed; the only permitted mutation is a full void,
/// which removes the header and all of its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    /// Human-facing invoice number (timestamp + random suffix), unique.
    pub invoice_number: String,
    /// Cashier who recorded the sale. NULL if the account was deleted.
    pub user_id: Option<String>,
    pub customer_name: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub grand_total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
///
/// Uses the snapshot pattern: `price_cents` is frozen at checkout time,
/// independent of later catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Quantity sold. Always positive.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub price_cents: i64,
    /// Line total (quantity × price unless the caller overrode it).
    pub total_cents: i64,
}

// =============================================================================
// Users & Roles
// =============================================================================

/// Access role attached to a user account.
///
/// The auth boundary verifies identity; the core only consumes the
/// resulting opaque user id + role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including voiding committed sales.
    Admin,
    /// Regular cashier access.
    Staff,
}

impl Role {
    /// Whether this role may void committed sales.
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A terminal operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Checkout Payload
// =============================================================================

/// One requested line in a checkout payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents, snapshotted into the sale item.
    pub price_cents: i64,
    /// Optional explicit line total; defaults to quantity × price.
    #[serde(default)]
    pub total_cents: Option<i64>,
}

impl CheckoutItem {
    /// Line total, applying the quantity × price default.
    ///
    /// The product saturates rather than overflowing; validated payloads
    /// (bounded quantity, non-negative price) never get near the limit.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.total_cents
            .unwrap_or_else(|| self.quantity.saturating_mul(self.price_cents))
    }
}

/// A checkout request as received from the boundary.
///
/// Optional monetary fields default to zero; `grand_total_cents` is
/// mandatory and must be positive (validated before any transaction opens).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    pub subtotal_cents: Option<i64>,
    #[serde(default)]
    pub tax_cents: Option<i64>,
    #[serde(default)]
    pub discount_cents: Option<i64>,
    #[serde(default)]
    pub grand_total_cents: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

// =============================================================================
// Sale Receipt
// =============================================================================

/// Result of a successful checkout.
///
/// A caller holding one of these can assume durable, fully-consistent
/// state: the sale header, every line item, and every stock decrement
/// were committed as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale_id: String,
    pub invoice_number: String,
    pub items_count: usize,
    pub grand_total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_status_boundaries() {
        assert_eq!(StockStatus::derive(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(1, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(6, 5), StockStatus::InStock);
    }

    #[test]
    fn derive_status_zero_threshold() {
        // min_stock = 0 means anything positive is healthy.
        assert_eq!(StockStatus::derive(0, 0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(1, 0), StockStatus::InStock);
    }

    #[test]
    fn derive_status_is_deterministic() {
        for qty in 0..20 {
            assert_eq!(StockStatus::derive(qty, 5), StockStatus::derive(qty, 5));
        }
    }

    #[test]
    fn line_total_defaults_to_quantity_times_price() {
        let item = CheckoutItem {
            product_id: "p1".to_string(),
            quantity: 3,
            price_cents: 250,
            total_cents: None,
        };
        assert_eq!(item.line_total_cents(), 750);
    }

    #[test]
    fn line_total_saturates_instead_of_overflowing() {
        let item = CheckoutItem {
            product_id: "p1".to_string(),
            quantity: 999,
            price_cents: i64::MAX,
            total_cents: None,
        };
        assert_eq!(item.line_total_cents(), i64::MAX);
    }

    #[test]
    fn line_total_respects_explicit_override() {
        let item = CheckoutItem {
            product_id: "p1".to_string(),
            quantity: 3,
            price_cents: 250,
            total_cents: Some(700), // line-level discount applied by caller
        };
        assert_eq!(item.line_total_cents(), 700);
    }

    #[test]
    fn payment_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Online).unwrap(),
            "\"online\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"card\"").unwrap(),
            PaymentMethod::Card
        );
    }

    #[test]
    fn default_payment_method_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn admin_gate() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Staff.is_admin());
    }
}
