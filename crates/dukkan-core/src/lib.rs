//! # dukkan-core: Pure Business Logic for Dukkan POS
//!
//! This crate is the heart of Dukkan POS: all business logic as pure
//! functions and value types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Dukkan POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 dukkan-terminal (session layer)                 │   │
//! │  │    Session ──► Checkout ──► Quotations ──► Held invoices        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukkan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  pricing  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Totals   │  │   │
//! │  │   │ Customer  │  │   Rate    │  │ CartItem  │  │  15% VAT  │  │   │
//! │  │   │   Sale    │  │ VAT_RATE  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   dukkan-db (Database Layer)                    │   │
//! │  │             SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, Quotation, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The session cart store
//! - [`pricing`] - Pure totals derivation (discount stacking, 15% VAT)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor units (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use dukkan_core::money::{Money, Rate};
//! use dukkan_core::pricing;
//!
//! // One line of 100.00 × 2 with a 10% invoice discount:
//! let totals = pricing::totals_of(
//!     Money::from_cents(20000),
//!     Money::zero(),
//!     Rate::from_bps(1000),
//! );
//! assert_eq!(totals.discount.cents(), 2000);
//! assert_eq!(totals.tax.cents(), 2700);
//! assert_eq!(totals.total.cents(), 20700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dukkan_core::Money` instead of
// `use dukkan_core::money::Money`.

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate, VAT_RATE};
pub use pricing::Totals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Guards against fat-finger entry (1000 typed instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
