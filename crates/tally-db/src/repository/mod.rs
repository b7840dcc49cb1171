//! # Repository Module
//!
//! Database repository implementations for Tally POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Repository Pattern Explained                   │
//! │                                                                 │
//! │  HTTP handler                                                   │
//! │       │                                                         │
//! │       │  db.sales().checkout(user_id, request)                  │
//! │       ▼                                                         │
//! │  SaleRepository                                                 │
//! │  ├── checkout(&self, user_id, request)   [transactional]        │
//! │  ├── void_sale(&self, sale_id)           [transactional]        │
//! │  ├── get_by_id(&self, id)                                       │
//! │  └── list_recent(&self, limit)                                  │
//! │       │                                                         │
//! │       │  SQL (plus ledger::apply_delta for stock writes)        │
//! │       ▼                                                         │
//! │  SQLite Database                                                │
//! │                                                                 │
//! │  Benefits:                                                      │
//! │  • SQL is isolated in one place per aggregate                   │
//! │  • Transaction boundaries live next to the queries they cover   │
//! │  • Handlers stay thin                                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, restock, low-stock listing
//! - [`sale::SaleRepository`] - Checkout, void, sale reads, reporting
//! - [`user::UserRepository`] - Operator accounts

pub mod product;
pub mod sale;
pub mod user;
