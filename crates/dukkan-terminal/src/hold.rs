//! # Held Invoices
//!
//! Parks the current cart under a label so the terminal can serve the next
//! customer, then restores it later. Held invoices are session-scoped and
//! in-memory only; the application keeps no durable state of its own, so
//! an unrecalled hold dies with the session.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use dukkan_core::pricing;
use dukkan_core::{CartItem, Customer};

use crate::error::{TerminalError, TerminalResult};
use crate::session::Session;

/// A parked cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldInvoice {
    pub id: String,
    /// Cashier-given label, or "invoice <n>" when none was supplied.
    pub label: String,
    pub items: Vec<CartItem>,
    pub customer: Option<Customer>,
    /// Grand total at hold time, for display in the recall list.
    pub total_cents: i64,
    pub held_at: DateTime<Utc>,
}

/// In-memory store of held invoices for one terminal.
#[derive(Debug, Clone, Default)]
pub struct HeldInvoices {
    inner: Arc<Mutex<Vec<HeldInvoice>>>,
}

impl HeldInvoices {
    /// Creates an empty store.
    pub fn new() -> Self {
        HeldInvoices::default()
    }

    /// Parks the current cart and clears the session.
    ///
    /// ## Errors
    /// `TerminalError::EmptyCart` when there is nothing to hold.
    pub fn hold(&self, session: &Session, label: Option<String>) -> TerminalResult<HeldInvoice> {
        let (items, customer, totals) = session.with_cart(|c| {
            (c.items().to_vec(), c.customer().cloned(), pricing::totals(c))
        });

        if items.is_empty() {
            return Err(TerminalError::EmptyCart);
        }

        let mut held = self.inner.lock().expect("Held invoices mutex poisoned");
        let label = label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| format!("invoice {}", held.len() + 1));

        let invoice = HeldInvoice {
            id: Uuid::new_v4().to_string(),
            label,
            items,
            customer,
            total_cents: totals.total.cents(),
            held_at: Utc::now(),
        };
        held.push(invoice.clone());
        drop(held);

        session.clear();

        debug!(id = %invoice.id, label = %invoice.label, "Invoice held");
        Ok(invoice)
    }

    /// Restores a held invoice into the session and drops it from the store.
    ///
    /// The current cart is cleared first; lines are re-added through the
    /// cart store from their product snapshots, so unit prices come back
    /// exactly as held. Per-line discounts do NOT survive a recall; the
    /// re-add path resets them, as the original recall did.
    pub fn recall(&self, session: &Session, id: &str) -> TerminalResult<HeldInvoice> {
        let invoice = self.take(id)?;

        session.clear();
        let restore = session.with_cart_mut(|c| -> dukkan_core::CoreResult<()> {
            for line in &invoice.items {
                c.add(&line.product, line.quantity)?;
            }
            c.set_customer(invoice.customer.clone());
            Ok(())
        });

        if let Err(err) = restore {
            // Put the snapshot back so nothing is lost, then surface.
            self.inner
                .lock()
                .expect("Held invoices mutex poisoned")
                .push(invoice);
            return Err(err.into());
        }

        debug!(id = %id, "Invoice recalled");
        Ok(invoice)
    }

    /// Deletes a held invoice without restoring it.
    pub fn discard(&self, id: &str) -> TerminalResult<HeldInvoice> {
        let invoice = self.take(id)?;
        debug!(id = %id, "Held invoice discarded");
        Ok(invoice)
    }

    /// Lists held invoices, oldest first.
    pub fn list(&self) -> Vec<HeldInvoice> {
        self.inner
            .lock()
            .expect("Held invoices mutex poisoned")
            .clone()
    }

    /// Checks whether any invoices are held.
    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .expect("Held invoices mutex poisoned")
            .is_empty()
    }

    fn take(&self, id: &str) -> TerminalResult<HeldInvoice> {
        let mut held = self.inner.lock().expect("Held invoices mutex poisoned");
        let position = held
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| TerminalError::HeldInvoiceNotFound(id.to_string()))?;
        Ok(held.remove(position))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_customer, test_product};

    #[test]
    fn test_hold_snapshots_and_clears_session() {
        let session = Session::new();
        let product = test_product("TEA-100", 10000, 10);
        session.add_product(&product, 2).unwrap();
        session.set_customer(Some(test_customer("Abu Khalid", 0)));

        let held = HeldInvoices::new();
        let invoice = held
            .hold(&session, Some("morning order".to_string()))
            .unwrap();

        assert_eq!(invoice.label, "morning order");
        assert_eq!(invoice.items.len(), 1);
        // 200.00 + 15% VAT
        assert_eq!(invoice.total_cents, 23000);
        assert!(invoice.customer.is_some());

        assert!(session.is_empty());
        assert!(session.with_cart(|c| c.customer().is_none()));
        assert_eq!(held.list().len(), 1);
    }

    #[test]
    fn test_hold_empty_cart_refused() {
        let session = Session::new();
        let held = HeldInvoices::new();
        assert!(matches!(
            held.hold(&session, None),
            Err(TerminalError::EmptyCart)
        ));
    }

    #[test]
    fn test_recall_restores_and_removes() {
        let session = Session::new();
        let product = test_product("TEA-100", 10000, 10);
        session.add_product(&product, 3).unwrap();
        session.set_customer(Some(test_customer("Umm Sara", 0)));

        let held = HeldInvoices::new();
        let invoice = held.hold(&session, None).unwrap();

        // Serve someone else in between
        session.add_product(&test_product("SUGAR-2KG", 1100, 5), 1).unwrap();

        held.recall(&session, &invoice.id).unwrap();

        assert_eq!(session.with_cart(|c| c.line_count()), 1);
        assert_eq!(session.with_cart(|c| c.items()[0].quantity), 3);
        assert_eq!(session.with_cart(|c| c.items()[0].unit_price_cents), 10000);
        assert!(session.with_cart(|c| c.customer().is_some()));
        assert!(held.is_empty());
    }

    #[test]
    fn test_recall_unknown_id() {
        let session = Session::new();
        let held = HeldInvoices::new();
        assert!(matches!(
            held.recall(&session, "ghost"),
            Err(TerminalError::HeldInvoiceNotFound(_))
        ));
    }

    #[test]
    fn test_discard_removes_without_restoring() {
        let session = Session::new();
        session
            .add_product(&test_product("TEA-100", 10000, 10), 1)
            .unwrap();

        let held = HeldInvoices::new();
        let invoice = held.hold(&session, None).unwrap();
        held.discard(&invoice.id).unwrap();

        assert!(held.is_empty());
        assert!(session.is_empty());
    }

    #[test]
    fn test_default_labels_number_upward() {
        let session = Session::new();
        let held = HeldInvoices::new();

        session
            .add_product(&test_product("A", 100, 10), 1)
            .unwrap();
        let first = held.hold(&session, None).unwrap();
        session
            .add_product(&test_product("B", 200, 10), 1)
            .unwrap();
        let second = held.hold(&session, Some("  ".to_string())).unwrap();

        assert_eq!(first.label, "invoice 1");
        assert_eq!(second.label, "invoice 2");
    }
}
