//! # Domain Types
//!
//! Core domain types used throughout Dukkan POS.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product          Customer          Sale / SaleItem                     │
//! │  ─────────        ─────────         ───────────────                     │
//! │  id (UUID)        id (UUID)         invoice_number                     │
//! │  sku / barcode    customer_type     payment_method / status            │
//! │  name / name_ar   credit_limit      subtotal/discount/tax/total        │
//! │  selling_cents    balance_cents     paid_cents                         │
//! │  stock_quantity                                                        │
//! │                                                                         │
//! │  Quotation / QuotationItem    CashTransaction    CustomerPayment       │
//! │  StockAdjustment              PaymentSplit (transient, never stored)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persisted structs keep their monetary fields as raw `i64` minor units
//! (matching the database columns); the [`Money`] accessors wrap them for
//! arithmetic. Sale and SaleItem are immutable snapshots after insert.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Names are bilingual (`name` English, `name_ar` Arabic); both are plain
/// data here, display-side concerns pick the right one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// English display name.
    pub name: String,

    /// Arabic display name.
    pub name_ar: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Sale unit ("piece", "kg", "box", ...).
    pub unit: String,

    /// Purchase cost in minor units. Independent of the selling price;
    /// no margin is enforced between the two.
    pub cost_cents: i64,

    /// Selling price in minor units. Copied into cart lines at add time.
    pub selling_cents: i64,

    /// Current stock level. Never negative after any adjustment.
    pub stock_quantity: i64,

    /// Reorder threshold for low-stock listings.
    pub min_stock_level: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_cents)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Checks whether stock has fallen to the reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Commercial classification of a customer.
///
/// Display-only: no pricing or credit computation keys off this today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Regular,
    Wholesale,
    Vip,
}

impl Default for CustomerType {
    fn default() -> Self {
        CustomerType::Regular
    }
}

/// A customer with an optional running credit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub customer_type: CustomerType,

    /// Advisory credit ceiling. Checkout deliberately does not enforce it.
    pub credit_limit_cents: i64,

    /// Accumulated unpaid amount. Incremented by credit sales, decremented
    /// by recorded payments.
    pub balance_cents: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the outstanding balance as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    /// Returns the advisory credit limit as Money.
    #[inline]
    pub fn credit_limit(&self) -> Money {
        Money::from_cents(self.credit_limit_cents)
    }
}

// =============================================================================
// Payments
// =============================================================================

/// How a payment (or part of one) was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Cash,
    Card,
    Credit,
    Transfer,
}

/// Settlement state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Fully settled at checkout.
    Paid,
    /// Partially settled; the remainder went onto the customer balance.
    Partial,
    /// Nothing paid; the whole amount went onto the customer balance.
    Pending,
}

/// One tender allocation within a checkout.
///
/// Splits are transient: they are summed into `paid_cents` and only the
/// FIRST split's kind survives on the sale header. Using several kinds in
/// one checkout therefore loses information, a known limitation carried
/// over from the original design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub kind: PaymentKind,
    pub amount_cents: i64,
    pub reference: Option<String>,
}

impl PaymentSplit {
    /// Convenience constructor without a reference.
    pub fn new(kind: PaymentKind, amount_cents: i64) -> Self {
        PaymentSplit {
            kind,
            amount_cents,
            reference: None,
        }
    }

    /// Returns the allocated amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale. Immutable after creation; never updated by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: Option<String>,
    /// Sum of line totals (already net of per-line discounts).
    pub subtotal_cents: i64,
    /// Effective invoice discount: flat amount + percentage portion.
    pub discount_cents: i64,
    /// The percentage component, kept for the record (basis points).
    pub discount_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub paid_cents: i64,
    /// Kind of the first tender split only.
    pub payment_method: PaymentKind,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the amount still owed (floored at zero).
    #[inline]
    pub fn outstanding(&self) -> Money {
        Money::from_cents((self.total_cents - self.paid_cents).max(0))
    }
}

/// A line item in a sale. Immutable snapshot of the cart line at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Per-line discount at time of sale (frozen).
    pub discount_cents: i64,
    /// quantity × unit_price − discount.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Quotation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl Default for QuotationStatus {
    fn default() -> Self {
        QuotationStatus::Pending
    }
}

/// A price quotation generated from the current cart. Unlike a sale it
/// moves no stock and no money.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Quotation {
    pub id: String,
    pub quotation_number: String,
    pub customer_id: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
    pub status: QuotationStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item in a quotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QuotationItem {
    pub id: String,
    pub quotation_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Cash Register
// =============================================================================

/// Kind of a cash-register movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CashTransactionKind {
    Opening,
    Closing,
    Deposit,
    Withdrawal,
}

/// A logged cash-register movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashTransaction {
    pub id: String,
    pub kind: CashTransactionKind,
    pub amount_cents: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl CashTransaction {
    /// Returns the movement amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Folds a day's register movements into the drawer balance.
///
/// Opening floats and deposits add; withdrawals AND closings subtract;
/// the original treats a closing entry as cash leaving the drawer.
pub fn cash_balance(transactions: &[CashTransaction]) -> Money {
    transactions.iter().fold(Money::zero(), |acc, tx| match tx.kind {
        CashTransactionKind::Opening | CashTransactionKind::Deposit => acc + tx.amount(),
        CashTransactionKind::Closing | CashTransactionKind::Withdrawal => acc - tx.amount(),
    })
}

// =============================================================================
// Customer Payment
// =============================================================================

/// A payment recorded against a customer's outstanding balance,
/// outside of any particular sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CustomerPayment {
    pub id: String,
    pub customer_id: String,
    pub amount_cents: i64,
    pub kind: PaymentKind,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// Direction of a manual stock correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Add,
    Subtract,
}

/// Audit row for a manual stock correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockAdjustment {
    pub id: String,
    pub product_id: String,
    pub kind: AdjustmentKind,
    pub quantity: i64,
    pub reason: String,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
