//! # Terminal Error Type
//!
//! Unified error type for session operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout / hold / quotation operation                                  │
//! │       │                                                                 │
//! │       ├── Cart rule violated ──── CoreError ────┐                       │
//! │       ├── Write rejected ───────── DbError ─────┼──► TerminalError      │
//! │       └── Session-level guard ───── own variants┘                       │
//! │                                                                         │
//! │  Every remote failure aborts the remaining steps and surfaces here as   │
//! │  one tagged error. Nothing is retried, nothing is rolled back.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use dukkan_core::CoreError;
use dukkan_db::DbError;

/// Error returned by session operations.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// A business rule in the cart or pricing layer was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository operation failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The operation needs a non-empty cart (hold, quotation).
    ///
    /// Checkout deliberately does NOT raise this; an empty cart checks
    /// out to a zero sale.
    #[error("Cart is empty")]
    EmptyCart,

    /// A held invoice id was not found in the session store.
    #[error("Held invoice not found: {0}")]
    HeldInvoiceNotFound(String),
}

/// Result type for session operations.
pub type TerminalResult<T> = Result<T, TerminalError>;
