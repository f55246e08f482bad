//! # dukkan-db: Database Layer for Dukkan POS
//!
//! This crate provides database access for the Dukkan POS system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session operation (checkout, catalog browse, register log)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     dukkan-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ ProductRepo   │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo  │    │ 001_init.sql │   │   │
//! │  │   │ Connection    │    │ SaleRepo      │    │              │   │   │
//! │  │   │ Management    │    │ QuotationRepo │    │              │   │   │
//! │  │   │               │    │ RegisterRepo  │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dukkan_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/dukkan.db")).await?;
//! let products = db.products().list_active(50).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::quotation::QuotationRepository;
pub use repository::register::RegisterRepository;
pub use repository::sale::SaleRepository;

// =============================================================================
// Test Support
// =============================================================================

/// Shared fixtures for the repository test modules.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::pool::{Database, DbConfig};
    use dukkan_core::{Customer, CustomerType, Product};

    /// Opens a migrated in-memory database.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    /// Builds an unsaved product with the given stock and price.
    pub fn test_product(sku: &str, selling_cents: i64, stock_quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            barcode: None,
            name: format!("Product {}", sku),
            name_ar: format!("منتج {}", sku),
            description: None,
            unit: "piece".to_string(),
            cost_cents: selling_cents / 2,
            selling_cents,
            stock_quantity,
            min_stock_level: 2,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds an unsaved customer with the given starting balance.
    pub fn test_customer(name: &str, balance_cents: i64) -> Customer {
        let now = Utc::now();
        Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: Some("0501234567".to_string()),
            email: None,
            address: None,
            tax_number: None,
            customer_type: CustomerType::Regular,
            credit_limit_cents: 100_000,
            balance_cents,
            created_at: now,
            updated_at: now,
        }
    }
}
