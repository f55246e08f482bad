//! # dukkan-terminal: Session Layer for Dukkan POS
//!
//! One POS terminal session: the live cart, the checkout orchestrator,
//! held invoices and quotation creation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   dukkan-terminal (THIS CRATE)                          │
//! │                                                                         │
//! │   ┌───────────┐  ┌────────────┐  ┌──────────────┐  ┌──────────────┐   │
//! │   │  Session  │  │  Checkout  │  │ HeldInvoices │  │  Quotations  │   │
//! │   │           │  │            │  │              │  │              │   │
//! │   │ Arc<Mutex │  │ totals →   │  │ hold/recall/ │  │ cart → offer │   │
//! │   │  <Cart>>  │  │ persist →  │  │ discard      │  │ (no stock,   │   │
//! │   │           │  │ stock →    │  │ (in-memory)  │  │  no money)   │   │
//! │   │           │  │ balance    │  │              │  │              │   │
//! │   └─────┬─────┘  └─────┬──────┘  └──────┬───────┘  └──────┬───────┘   │
//! │         │              │                │                 │           │
//! │         ▼              ▼                ▼                 ▼           │
//! │   dukkan-core     dukkan-db        dukkan-core       dukkan-db        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is an explicit object handed to each collaborator; no
//! process-wide singleton. Each browser-tab-equivalent gets its own
//! `Session` and its own `HeldInvoices`; they share nothing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dukkan_core::{PaymentKind, PaymentSplit};
//! use dukkan_db::{Database, DbConfig};
//! use dukkan_terminal::{Checkout, Session};
//!
//! let db = Database::new(DbConfig::new("./dukkan.db")).await?;
//! let session = Session::new();
//!
//! let product = db.products().get_by_sku("TEA-100").await?.unwrap();
//! session.add_product(&product, 2)?;
//!
//! let checkout = Checkout::new(db, session);
//! let receipt = checkout
//!     .process_sale(&[PaymentSplit::new(PaymentKind::Cash, 20700)])
//!     .await?;
//! println!("{}; change {}", receipt.invoice_number, receipt.change);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod hold;
pub mod quote;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{Checkout, CheckoutPhase, Receipt, ReceiptLine};
pub use error::{TerminalError, TerminalResult};
pub use hold::{HeldInvoice, HeldInvoices};
pub use quote::Quotations;
pub use session::Session;

// =============================================================================
// Test Support
// =============================================================================

/// Shared fixtures for the session-layer test modules.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use dukkan_core::{Customer, CustomerType, Product};
    use dukkan_db::{Database, DbConfig};

    /// Opens a migrated in-memory database.
    pub async fn seeded_db() -> Database {
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
