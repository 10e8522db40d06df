//! Shopper cart aggregate.
//!
//! The cart is owned by a single shopper session. Items keep the order in
//! which they were first added, and totals are derived fresh on every call
//! so they can never drift from the item list.

pub mod storage;

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

pub use storage::{CART_NAMESPACE, CartSession, CartStorage, InMemoryCartStorage};

/// Catalog snapshot carried by a cart item.
///
/// The price here is what the shopper saw when adding the item; checkout
/// charges this price, not a re-fetched catalog price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// The product identifier.
    pub id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Unit price at the time the item was added.
    pub price: Money,
}

impl CartProduct {
    /// Creates a new cart product snapshot.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

/// A product selection in the cart.
///
/// Invariant: quantity is always at least 1; an item whose quantity would
/// drop to zero is removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The selected product snapshot.
    pub product: CartProduct,

    /// Number of units selected.
    pub quantity: u32,
}

/// Insertion-ordered collection of cart items, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the items in add order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of the product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new item is appended with quantity 1.
    pub fn add_item(&mut self, product: CartProduct) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Removes the matching item if present; no-op otherwise.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Sets the quantity of an item already in the cart.
    ///
    /// A quantity of zero or less removes the item. No-op if the product
    /// is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity as u32;
        }
    }

    /// Empties the cart. Called only after a checkout attempt is confirmed
    /// successful, or on an explicit reset.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all items, recomputed on each call.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total price across all items, recomputed on each call.
    pub fn total_price(&self) -> Money {
        self.items
            .iter()
            .map(|i| i.product.price.multiply(i.quantity))
            .sum()
    }
}
