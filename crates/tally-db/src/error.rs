//! # Database Error Types
//!
//! Error types for database operations and the stock-mutating flows.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                          │
//! │                                                                 │
//! │  SQLite Error (sqlx::Error)                                     │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  DbError (this module) ← adds context and categorization        │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  SaleError = CoreError ∪ DbError ← what checkout/void return    │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ApiError (in server) ← HTTP status + JSON body                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use tally_core::{CoreError, ValidationError};

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate SKU
    /// - An invoice-number collision (retried by the checkout flow)
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Deleting a product referenced by a sale item (RESTRICT)
    /// - Inserting a sale for a non-existent user
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction-level failure (begin/commit/rollback, or a
    /// conditional-update conflict). Treated as opaque by callers.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether this is a unique-constraint violation (used by the
    /// invoice-number retry in checkout).
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for plain database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Sale Error
// =============================================================================

/// Error type returned by the stock-mutating flows (checkout, void,
/// restock): the union of business-rule failures and storage failures.
///
/// Business variants (`Core`) carry user-facing context; storage variants
/// (`Db`) are surfaced as opaque internal failures by the boundary.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl SaleError {
    /// Convenience constructor for a missing product.
    pub fn product_not_found(id: impl Into<String>) -> Self {
        SaleError::Core(CoreError::ProductNotFound(id.into()))
    }

    /// Convenience constructor for a missing sale.
    pub fn sale_not_found(id: impl Into<String>) -> Self {
        SaleError::Core(CoreError::SaleNotFound(id.into()))
    }
}

impl From<ValidationError> for SaleError {
    fn from(err: ValidationError) -> Self {
        SaleError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for SaleError {
    fn from(err: sqlx::Error) -> Self {
        SaleError::Db(err.into())
    }
}

/// Result type for stock-mutating flows.
pub type SaleResult<T> = Result<T, SaleError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_wraps_into_sale_error() {
        let err: SaleError = ValidationError::EmptyList {
            field: "items".to_string(),
        }
        .into();
        assert!(matches!(err, SaleError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn unique_violation_detection() {
        let err = DbError::UniqueViolation {
            field: "sales.invoice_number".to_string(),
        };
        assert!(err.is_unique_violation());
        assert!(!DbError::PoolExhausted.is_unique_violation());
    }
}
