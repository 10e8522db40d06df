//! Cart persistence port.
//!
//! The cart survives page reloads by writing to a storage backend after
//! every mutation, keyed by a fixed namespace. Storage is an injected port
//! so the same session logic runs against browser-local storage, a server
//! session, or an in-memory map in tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Cart, CartProduct};
use common::ProductId;
use crate::money::Money;

/// Fixed storage key under which the shopper's cart is persisted.
pub const CART_NAMESPACE: &str = "cart-storage";

/// Storage backend for persisted carts.
///
/// Implementations are keyed blobs; the cart is serialized as JSON. Writes
/// are whole-cart replacements: concurrent writers (e.g., two browser tabs)
/// are not coordinated and the last writer wins.
pub trait CartStorage {
    /// Loads the cart stored under `key`, if any.
    fn load(&self, key: &str) -> Option<Cart>;

    /// Stores `cart` under `key`, replacing any previous value.
    fn save(&self, key: &str, cart: &Cart);

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str);
}

/// In-memory cart storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryCartStorage {
    /// Creates a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for InMemoryCartStorage {
    fn load(&self, key: &str) -> Option<Cart> {
        let entries = self.entries.read().unwrap();
        let raw = entries.get(key)?;
        serde_json::from_str(raw).ok()
    }

    fn save(&self, key: &str, cart: &Cart) {
        if let Ok(raw) = serde_json::to_string(cart) {
            let mut entries = self.entries.write().unwrap();
            entries.insert(key.to_string(), raw);
        }
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
    }
}

/// A cart bound to its persistence backend.
///
/// Every mutation is written through to storage immediately, so the cart
/// a shopper sees after a reload matches the last mutation they made.
#[derive(Debug)]
pub struct CartSession<S: CartStorage> {
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartSession<S> {
    /// Opens the session, restoring any previously persisted cart.
    pub fn open(storage: S) -> Self {
        let cart = storage.load(CART_NAMESPACE).unwrap_or_default();
        Self { storage, cart }
    }

    /// Returns the current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of the product and persists.
    pub fn add_item(&mut self, product: CartProduct) {
        self.cart.add_item(product);
        self.persist();
    }

    /// Removes the matching item and persists.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.cart.remove_item(product_id);
        self.persist();
    }

    /// Updates an item quantity (zero or less removes) and persists.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        self.cart.update_quantity(product_id, quantity);
        self.persist();
    }

    /// Empties the cart and drops the persisted entry.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.storage.remove(CART_NAMESPACE);
    }

    /// Total number of units across all items.
    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    /// Total price across all items.
    pub fn total_price(&self) -> Money {
        self.cart.total_price()
    }

    fn persist(&self) {
        self.storage.save(CART_NAMESPACE, &self.cart);
    }
}
