//! # Checkout Orchestrator
//!
//! Drives one checkout attempt end to end.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  process_sale(splits)                                                   │
//! │                                                                         │
//! │  1. Snapshot cart + customer + totals (one lock acquisition)            │
//! │  2. paid = Σ splits, payment_status from paid vs total                  │
//! │  3. Insert sale header (invoice number from date + UUID token)          │
//! │  4. Insert one item row per cart line                                   │
//! │  5. Per line: conditional stock decrement (fails on insufficient)       │
//! │  6. Credit sale? increment customer balance by total − paid             │
//! │  7. Clear the session, return the receipt                               │
//! │                                                                         │
//! │  Phases: Idle → Processing → Completed | Failed                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 3-6 are sequential writes with NO transaction around them. A
//! failure aborts the remaining steps and surfaces one tagged error; writes
//! already applied stay applied. A caller retry re-runs everything under a
//! fresh invoice number.

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use dukkan_core::pricing::{self, Totals};
use dukkan_core::{
    CartItem, Customer, Money, PaymentKind, PaymentSplit, PaymentStatus, Rate, Sale, SaleItem,
};
use dukkan_db::Database;

use crate::error::TerminalResult;
use crate::session::Session;

// =============================================================================
// Phase
// =============================================================================

/// Where the orchestrator is within the current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutPhase {
    /// No attempt started, or the last one was consumed.
    Idle,
    /// Remote writes are in flight. No timeout and no cancellation path:
    /// a hung call keeps the attempt here indefinitely.
    Processing,
    /// Last attempt persisted everything and cleared the session.
    Completed,
    /// Last attempt aborted partway; already-applied writes remain.
    Failed,
}

// =============================================================================
// Receipt
// =============================================================================

/// What a successful checkout hands back for display/printing.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub sale_id: String,
    pub invoice_number: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
    pub payment_status: PaymentStatus,
}

/// One printed line of the receipt.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub name_ar: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Checkout orchestrator bound to one database and one session.
#[derive(Debug)]
pub struct Checkout {
    db: Database,
    session: Session,
    phase: Mutex<CheckoutPhase>,
}

impl Checkout {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(db: Database, session: Session) -> Self {
        Checkout {
            db,
            session,
            phase: Mutex::new(CheckoutPhase::Idle),
        }
    }

    /// Returns the phase of the current/last attempt.
    pub fn phase(&self) -> CheckoutPhase {
        *self.phase.lock().expect("Checkout phase mutex poisoned")
    }

    /// Processes the sale against the current cart.
    ///
    /// ## Preconditions
    /// None. An empty cart or a zero total still checks out; callers gate
    /// the button, this core does not assume they did.
    ///
    /// ## Payment semantics
    /// - `paid = Σ splits`; `paid ≥ total` → paid, `paid > 0` → partial,
    ///   else pending
    /// - Only the FIRST split's kind is stored as the sale's payment
    ///   method (cash when no splits were given)
    /// - For a non-paid sale with a customer attached, `total − paid` is
    ///   added to the customer balance. The credit limit is NOT checked.
    ///
    /// ## Failure semantics
    /// Any repository error aborts the remaining steps and is returned as
    /// the tagged error; nothing is retried or rolled back. The cart is
    /// only cleared on success.
    pub async fn process_sale(&self, splits: &[PaymentSplit]) -> TerminalResult<Receipt> {
        self.set_phase(CheckoutPhase::Processing);

        let result = self.run(splits).await;

        match &result {
            Ok(receipt) => {
                self.set_phase(CheckoutPhase::Completed);
                info!(
                    sale_id = %receipt.sale_id,
                    invoice_number = %receipt.invoice_number,
                    total = %receipt.total,
                    status = ?receipt.payment_status,
                    "Sale completed"
                );
            }
            Err(err) => {
                self.set_phase(CheckoutPhase::Failed);
                tracing::error!(error = %err, "Sale failed");
            }
        }

        result
    }

    async fn run(&self, splits: &[PaymentSplit]) -> TerminalResult<Receipt> {
        // One lock acquisition: lines, customer, discount rate and totals
        // must come from the same cart state.
        let (items, customer, discount_rate, totals): (
            Vec<CartItem>,
            Option<Customer>,
            Rate,
            Totals,
        ) = self.session.with_cart(|c| {
            (
                c.items().to_vec(),
                c.customer().cloned(),
                c.discount_rate(),
                pricing::totals(c),
            )
        });

        let paid: Money = splits.iter().map(|s| s.amount()).sum();
        let payment_status = pricing::payment_status(paid, totals.total);
        let payment_method = splits
            .first()
            .map(|s| s.kind)
            .unwrap_or(PaymentKind::Cash);

        let sale_id = Uuid::new_v4().to_string();
        let invoice_number = generate_document_number("INV");
        let now = Utc::now();

        debug!(
            sale_id = %sale_id,
            invoice_number = %invoice_number,
            lines = items.len(),
            total = %totals.total,
            paid = %paid,
            "Processing sale"
        );

        // Step 1: sale header
        let sale = Sale {
            id: sale_id.clone(),
            invoice_number: invoice_number.clone(),
            customer_id: customer.as_ref().map(|c| c.id.clone()),
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount.cents(),
            discount_bps: discount_rate.bps(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            paid_cents: paid.cents(),
            payment_method,
            payment_status,
            notes: None,
            created_at: now,
        };
        self.db.sales().insert_sale(&sale).await?;

        // Step 2: item snapshots
        let sale_items: Vec<SaleItem> = items
            .iter()
            .map(|line| SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: line.product.id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                discount_cents: line.discount_cents,
                total_cents: line.total_cents,
                created_at: now,
            })
            .collect();
        self.db.sales().insert_items(&sale_items).await?;

        // Step 3: stock. The conditional decrement is the authority;
        // the cart's stock snapshot is never consulted.
        for line in &items {
            self.db
                .products()
                .sell_stock(&line.product.id, line.quantity)
                .await?;
        }

        // Step 4: credit balance
        if let Some(customer) = &customer {
            if payment_status != PaymentStatus::Paid {
                self.db
                    .customers()
                    .adjust_balance(&customer.id, totals.total - paid)
                    .await?;
            }
        }

        // Success: cart, customer and discounts all reset.
        self.session.clear();

        Ok(Receipt {
            sale_id,
            invoice_number,
            lines: items
                .into_iter()
                .map(|line| ReceiptLine {
                    name: line.product.name.clone(),
                    name_ar: line.product.name_ar.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price(),
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: totals.subtotal,
            discount: totals.discount,
            tax: totals.tax,
            total: totals.total,
            paid,
            change: pricing::change_due(paid, totals.total),
            payment_status,
        })
    }

    fn set_phase(&self, phase: CheckoutPhase) {
        *self.phase.lock().expect("Checkout phase mutex poisoned") = phase;
    }
}

// =============================================================================
// Document numbering
// =============================================================================

/// Generates a collision-resistant document number: `PFX-YYYYMMDD-<token>`.
///
/// The token is the first 10 hex digits of a UUID v4, so two checkouts in
/// the same millisecond get distinct numbers (a plain timestamp would not).
pub(crate) fn generate_document_number(prefix: &str) -> String {
    let date = Utc::now().format("%Y%m%d");
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, date, &token[..10])
}

// =============================================================================
// Unit Tests
// =============================================================================
