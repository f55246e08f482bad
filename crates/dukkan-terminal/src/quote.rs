//! # Quotation Creation
//!
//! Turns the current cart into a persisted quotation: a priced offer with a
//! validity date. Unlike checkout it moves no stock and no money, and the
//! cart stays intact afterwards so the cashier can keep working with it.

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use dukkan_core::pricing;
use dukkan_core::{Quotation, QuotationItem, QuotationStatus};
use dukkan_db::Database;

use crate::checkout::generate_document_number;
use crate::error::{TerminalError, TerminalResult};
use crate::session::Session;

/// Quotation builder bound to one database and one session.
#[derive(Debug)]
pub struct Quotations {
    db: Database,
    session: Session,
}

impl Quotations {
    /// Creates a builder over the given collaborators.
    pub fn new(db: Database, session: Session) -> Self {
        Quotations { db, session }
    }

    /// Persists a pending quotation from the current cart.
    ///
    /// ## Behavior
    /// - Empty cart is refused (unlike checkout)
    /// - Totals include the session's invoice discounts
    /// - The cart is NOT cleared; the offer may still become a sale
    pub async fn create_quotation(
        &self,
        valid_until: NaiveDate,
        notes: Option<String>,
    ) -> TerminalResult<Quotation> {
        let (items, customer_id, totals) = self.session.with_cart(|c| {
            (
                c.items().to_vec(),
                c.customer().map(|cu| cu.id.clone()),
                pricing::totals(c),
            )
        });

        if items.is_empty() {
            return Err(TerminalError::EmptyCart);
        }

        let now = Utc::now();
        let quotation = Quotation {
            id: Uuid::new_v4().to_string(),
            quotation_number: generate_document_number("QUO"),
            customer_id,
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            valid_until,
            notes,
            status: QuotationStatus::Pending,
            created_at: now,
        };

        self.db.quotations().insert_quotation(&quotation).await?;

        let quotation_items: Vec<QuotationItem> = items
            .iter()
            .map(|line| QuotationItem {
                id: Uuid::new_v4().to_string(),
                quotation_id: quotation.id.clone(),
                product_id: line.product.id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                total_cents: line.total_cents,
                created_at: now,
            })
            .collect();
        self.db.quotations().insert_items(&quotation_items).await?;

        info!(
            quotation_id = %quotation.id,
            quotation_number = %quotation.quotation_number,
            lines = quotation_items.len(),
            "Quotation created"
        );

        Ok(quotation)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
