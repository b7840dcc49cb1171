//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  tally-core errors (this file)                                  │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  tally-db errors (separate crate)                               │
//! │  ├── DbError          - Database operation failures             │
//! │  └── SaleError        - CoreError ∪ DbError for write flows     │
//! │                                                                 │
//! │  Server errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see (serialized)      │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → SaleError → ApiError       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Validation errors are raised before any transaction opens

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations discovered during sale
/// processing. They carry enough context for a precise user-facing message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced product does not exist.
    ///
    /// ## When This Occurs
    /// - Checkout item names a product id that isn't in the catalog
    /// - Product was deleted between listing and checkout
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Not enough stock to satisfy a requested line item.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (qty: 5)
    ///      │
    ///      ▼
    /// Ledger check: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Coca-Cola 330ml", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for Coca-Cola 330ml: available 3, requested 5"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Sale not found (void of an unknown or already-voided sale).
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a checkout payload doesn't meet requirements, always
/// *before* business logic runs or a transaction opens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A list field must contain at least one entry.
    #[error("{field} must contain at least one item")]
    EmptyList { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
