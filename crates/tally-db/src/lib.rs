//! # tally-db: Database Layer for Tally POS
//!
//! This crate provides database access for the Tally POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Tally POS Data Flow                        │
//! │                                                                 │
//! │  HTTP handler (POST /api/sales)                                 │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                   tally-db (THIS CRATE)                   │  │
//! │  │                                                           │  │
//! │  │  ┌────────────┐   ┌──────────────┐   ┌──────────────┐    │  │
//! │  │  │  Database  │   │ Repositories │   │  Migrations  │    │  │
//! │  │  │ (pool.rs)  │   │ product.rs   │   │  (embedded)  │    │  │
//! │  │  │            │◄──│ sale.rs      │   │ 001_init.sql │    │  │
//! │  │  │ SqlitePool │   │ user.rs      │   │              │    │  │
//! │  │  └────────────┘   └──────┬───────┘   └──────────────┘    │  │
//! │  │                         │                                │  │
//! │  │                  ┌──────▼───────┐                        │  │
//! │  │                  │    ledger    │  one row update per    │  │
//! │  │                  │ (apply_delta)│  call, caller's tx     │  │
//! │  │                  └──────────────┘                        │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  SQLite Database (WAL mode, foreign keys ON)                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and sale-flow error types
//! - [`ledger`] - Atomic stock mutation (the inventory ledger)
//! - [`repository`] - Repository implementations (product, sale, user)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tally.db")).await?;
//!
//! // The whole checkout is one atomic transaction.
//! let receipt = db.sales().checkout("user-id", request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, SaleError, SaleResult};
pub use ledger::StockLevel;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::{NewProduct, ProductRepository, ProductUpdate};
pub use repository::sale::{SaleRepository, SalesSummary};
pub use repository::user::UserRepository;
