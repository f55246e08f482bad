//! # Cart Store
//!
//! The in-memory cart for one terminal session: an ordered list of line
//! items plus the selected customer and the invoice-level discount fields.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Scan / tap product ────► add() ──────────────► merge or append line   │
//! │  Change quantity ───────► update_quantity() ──► recompute line total   │
//! │  Remove line ───────────► remove() ───────────► delete line            │
//! │  Cancel / checkout ─────► clear() ────────────► lines + customer +     │
//! │                                                 discounts all reset    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product.id` (re-adding merges quantities)
//! - Line quantity is always ≥ 1 (an update to ≤ 0 removes the line)
//! - `total_cents = quantity × unit_price_cents − discount_cents` on every
//!   line, maintained on every mutation
//! - The product held by a line is a snapshot frozen at add time; later
//!   catalog edits do not reach lines already in the cart

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Rate};
use crate::types::{Customer, Product};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// One line in the cart.
///
/// `unit_price_cents` is copied from `product.selling_cents` when the line
/// is created and never re-read; the price is locked at add time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot frozen at add time.
    pub product: Product,

    /// Quantity in the cart (≥ 1).
    pub quantity: i64,

    /// Unit price at add time (frozen).
    pub unit_price_cents: i64,

    /// Per-line discount. No interactive path sets this today, but the
    /// store keeps it writable (see [`Cart::set_line_discount`]) and the
    /// line total always subtracts it.
    pub discount_cents: i64,

    /// quantity × unit_price − discount. Recomputed on every mutation.
    pub total_cents: i64,
}

impl CartItem {
    fn from_product(product: &Product, quantity: i64) -> Self {
        let unit_price_cents = product.selling_cents;
        CartItem {
            product: product.clone(),
            quantity,
            unit_price_cents,
            discount_cents: 0,
            total_cents: quantity * unit_price_cents,
        }
    }

    fn recompute_total(&mut self) {
        self.total_cents = self.quantity * self.unit_price_cents - self.discount_cents;
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The session cart: lines, selected customer, invoice discounts.
///
/// Owned exclusively by one terminal session; never shared across
/// sessions and never persisted (held invoices snapshot it instead).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    customer: Option<Customer>,
    discount_cents: i64,
    discount_bps: u32,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantities merge and the line total is
    ///   recomputed against the ORIGINAL frozen unit price and the line's
    ///   current discount
    /// - New product: appended with `unit_price = product.selling_cents`
    ///   and zero discount
    ///
    /// Available stock is deliberately NOT checked here; the conditional
    /// decrement at checkout is the authority on stock.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            item.quantity = new_qty;
            item.recompute_total();
            return Ok(());
        }

        if self.items.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets a line's quantity; a quantity ≤ 0 removes the line.
    ///
    /// Unknown product ids are a silent no-op, mirroring a stale row in a
    /// UI list that was already removed.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
            item.recompute_total();
        }
        Ok(())
    }

    /// Removes a line unconditionally.
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Sets a per-line discount and recomputes the line total.
    pub fn set_line_discount(&mut self, product_id: &str, discount: Money) -> CoreResult<()> {
        if discount.is_negative() {
            return Err(CoreError::Validation(
                crate::error::ValidationError::MustBePositive {
                    field: "line discount".to_string(),
                },
            ));
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.discount_cents = discount.cents();
            item.recompute_total();
        }
        Ok(())
    }

    /// Empties the cart AND clears the selected customer AND resets both
    /// invoice discount fields.
    ///
    /// Callers invoking this for unrelated reasons also lose the customer
    /// selection; that conflation is part of the contract.
    pub fn clear(&mut self) {
        self.items.clear();
        self.customer = None;
        self.discount_cents = 0;
        self.discount_bps = 0;
    }

    // -------------------------------------------------------------------------
    // Customer & discounts
    // -------------------------------------------------------------------------

    /// Selects or deselects the customer for this sale.
    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
    }

    /// Returns the selected customer, if any.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Sets the flat invoice discount.
    pub fn set_discount_amount(&mut self, amount: Money) {
        self.discount_cents = amount.cents();
    }

    /// Returns the flat invoice discount.
    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Sets the percentage invoice discount.
    pub fn set_discount_rate(&mut self, rate: Rate) {
        self.discount_bps = rate.bps();
    }

    /// Returns the percentage invoice discount.
    #[inline]
    pub fn discount_rate(&self) -> Rate {
        Rate::from_bps(self.discount_bps)
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Returns the cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, selling_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            barcode: None,
            name: format!("Product {}", id),
            name_ar: format!("منتج {}", id),
            description: None,
            unit: "piece".to_string(),
            cost_cents: selling_cents / 2,
            selling_cents,
            stock_quantity: 50,
            min_stock_level: 5,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 999), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.items()[0].total_cents, 1998);
    }

    #[test]
    fn test_add_same_product_merges_quantities() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000);

        cart.add(&product, 2).unwrap();
        cart.add(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        let line = &cart.items()[0];
        assert_eq!(line.quantity, 5);
        assert_eq!(line.total_cents, 5 * 10000);
    }

    #[test]
    fn test_merge_keeps_frozen_price_and_discount() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 10000);

        cart.add(&product, 2).unwrap();
        cart.set_line_discount("1", Money::from_cents(500)).unwrap();

        // Catalog price change after add must not affect the line
        product.selling_cents = 99999;
        cart.add(&product, 1).unwrap();

        let line = &cart.items()[0];
        assert_eq!(line.unit_price_cents, 10000);
        assert_eq!(line.total_cents, 3 * 10000 - 500);
    }

    #[test]
    fn test_update_quantity_recomputes_total() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 250), 1).unwrap();
        cart.update_quantity("1", 4).unwrap();

        assert_eq!(cart.items()[0].total_cents, 1000);
    }

    #[test]
    fn test_zero_or_negative_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 999), 1).unwrap();
        cart.add(&test_product("2", 500), 1).unwrap();

        cart.update_quantity("1", 0).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert!(cart.items().iter().all(|i| i.product.id != "1"));

        cart.update_quantity("2", -3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 999), 1).unwrap();

        cart.remove("1");
        assert!(cart.is_empty());

        // Unknown id is a no-op, not an error
        cart.remove("ghost");
    }

    #[test]
    fn test_clear_resets_customer_and_discounts() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 999), 1).unwrap();
        cart.set_customer(Some(Customer {
            id: "c1".to_string(),
            name: "Abu Khalid".to_string(),
            phone: None,
            email: None,
            address: None,
            tax_number: None,
            customer_type: crate::types::CustomerType::Regular,
            credit_limit_cents: 100000,
            balance_cents: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }));
        cart.set_discount_amount(Money::from_cents(1000));
        cart.set_discount_rate(Rate::from_bps(500));

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.customer().is_none());
        assert!(cart.discount_amount().is_zero());
        assert!(cart.discount_rate().is_zero());
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        assert!(cart.add(&product, MAX_LINE_QUANTITY).is_ok());
        assert!(matches!(
            cart.add(&product, 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(cart.add(&test_product("1", 999), 0).is_err());
        assert!(cart.add(&test_product("1", 999), -1).is_err());
    }
}
