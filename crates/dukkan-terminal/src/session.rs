//! # Terminal Session
//!
//! Owns the live cart for one terminal. The session is an explicit object
//! passed by reference to whatever needs it (UI bindings, the checkout
//! orchestrator, the held-invoice store); there is no process-wide
//! singleton.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`:
//! 1. UI events and the checkout may touch the cart from different tasks
//! 2. Only one caller may mutate at a time
//! 3. Cloning a `Session` clones the handle, not the cart

use std::sync::{Arc, Mutex};

use dukkan_core::pricing::{self, Totals};
use dukkan_core::{Cart, CoreResult, Customer, Money, Product, Rate};

/// Handle to one terminal's cart state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    cart: Arc<Mutex<Cart>>,
}

impl Session {
    /// Creates a session with an empty cart.
    pub fn new() -> Self {
        Session {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = session.with_cart(|cart| cart.line_count());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session.with_cart_mut(|cart| cart.add(&product, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    // -------------------------------------------------------------------------
    // Convenience passthroughs
    // -------------------------------------------------------------------------

    /// Adds a product to the cart (merging with an existing line).
    pub fn add_product(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        self.with_cart_mut(|c| c.add(product, quantity))
    }

    /// Sets a line's quantity; ≤ 0 removes the line.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<()> {
        self.with_cart_mut(|c| c.update_quantity(product_id, quantity))
    }

    /// Removes a line unconditionally.
    pub fn remove_product(&self, product_id: &str) {
        self.with_cart_mut(|c| c.remove(product_id));
    }

    /// Selects or deselects the sale customer.
    pub fn set_customer(&self, customer: Option<Customer>) {
        self.with_cart_mut(|c| c.set_customer(customer));
    }

    /// Sets the flat invoice discount.
    pub fn set_discount_amount(&self, amount: Money) {
        self.with_cart_mut(|c| c.set_discount_amount(amount));
    }

    /// Sets the percentage invoice discount.
    pub fn set_discount_rate(&self, rate: Rate) {
        self.with_cart_mut(|c| c.set_discount_rate(rate));
    }

    /// Clears the cart, the customer and the discounts.
    pub fn clear(&self) {
        self.with_cart_mut(|c| c.clear());
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.with_cart(|c| c.is_empty())
    }

    /// Computes the current totals from live cart state.
    pub fn totals(&self) -> Totals {
        self.with_cart(pricing::totals)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, selling_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            barcode: None,
            name: format!("Product {}", id),
            name_ar: format!("منتج {}", id),
            description: None,
            unit: "piece".to_string(),
            cost_cents: 0,
            selling_cents,
            stock_quantity: 10,
            min_stock_level: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_totals_follow_cart() {
        let session = Session::new();
        session.add_product(&product("1", 10000), 2).unwrap();
        session.set_discount_rate(Rate::from_bps(1000));

        let totals = session.totals();
        assert_eq!(totals.subtotal.cents(), 20000);
        assert_eq!(totals.total.cents(), 20700);
    }

    #[test]
    fn test_clones_share_one_cart() {
        let session = Session::new();
        let handle = session.clone();

        handle.add_product(&product("1", 500), 1).unwrap();
        assert!(!session.is_empty());

        session.clear();
        assert!(handle.is_empty());
    }
}
