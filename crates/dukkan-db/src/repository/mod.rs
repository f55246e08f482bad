//! # Repository Module
//!
//! Database repository implementations for Dukkan POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session operation                                                      │
//! │       │                                                                 │
//! │       │  db.products().list_active(50)                                  │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list_active(&self, limit)                                          │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── sell_stock(&self, id, qty)   ← conditional decrement               │
//! │  └── ...                                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and stock movements
//! - [`customer::CustomerRepository`] - Customers, balances, payments
//! - [`sale::SaleRepository`] - Sale headers and item snapshots
//! - [`quotation::QuotationRepository`] - Quotation headers and items
//! - [`register::RegisterRepository`] - Cash drawer movements

pub mod customer;
pub mod product;
pub mod quotation;
pub mod register;
pub mod sale;
