//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate is the **heart** of Tally POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Tally POS Architecture                      │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                  HTTP Boundary (axum)                     │  │
//! │  │    POST /api/sales, DELETE /api/sales/:id, catalog CRUD   │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │              ★ tally-core (THIS CRATE) ★                  │  │
//! │  │                                                           │  │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐          │  │
//! │  │   │   types   │  │ validation │  │   error    │          │  │
//! │  │   │  Product  │  │  checkout  │  │ CoreError  │          │  │
//! │  │   │StockStatus│  │   rules    │  │ Validation │          │  │
//! │  │   └───────────┘  └────────────┘  └────────────┘          │  │
//! │  │                                                           │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS     │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │                tally-db (Database Layer)                  │  │
//! │  │     SQLite queries, migrations, ledger, checkout tx       │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, StockStatus, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Checkout payload validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::StockStatus;
//!
//! // The stock-status rule lives in exactly one place.
//! assert_eq!(StockStatus::derive(0, 5), StockStatus::OutOfStock);
//! assert_eq!(StockStatus::derive(3, 5), StockStatus::LowStock);
//! assert_eq!(StockStatus::derive(9, 5), StockStatus::InStock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Product` instead of
// `use tally_core::types::Product`

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer name recorded when the caller leaves it blank.
pub const DEFAULT_CUSTOMER_NAME: &str = "Walk-in Customer";

/// Reorder threshold applied to new products that don't specify one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Maximum line items allowed in a single sale.
///
/// ## Business Reason
/// Prevents runaway payloads and keeps the sequential per-item
/// transaction loop bounded.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
