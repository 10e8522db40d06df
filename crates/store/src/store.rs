use std::pin::Pin;

use async_trait::async_trait;
use common::{AddressId, OrderId, ProductId, UserId};
use domain::{Address, Money, Order, OrderStatus, Product, Role, User};
use futures_core::Stream;

use crate::Result;

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Input for creating a shipping address.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub user_id: UserId,
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

/// Input for creating a catalog product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub price: Money,
    pub stock: u32,
    pub active: bool,
}

/// A stream of orders, newest first.
pub type OrderStream = Pin<Box<dyn Stream<Item = Result<Order>> + Send>>;

/// Core trait for data store implementations.
///
/// The store is the only shared mutable resource between the checkout
/// request and the later payment-verification request, so the paid
/// transition is exposed as an atomic conditional update rather than a
/// read-modify-write. All implementations must be thread-safe.
#[async_trait]
pub trait Store: Send + Sync {
    // -- Users --

    /// Creates a user. Fails with `Duplicate` if the email is taken.
    async fn create_user(&self, new: NewUser) -> Result<User>;

    /// Finds a user by internal id.
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    /// Finds a user by unique email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // -- Addresses --

    /// Creates a shipping address.
    async fn create_address(&self, new: NewAddress) -> Result<Address>;

    /// Finds an address by id.
    async fn find_address(&self, id: AddressId) -> Result<Option<Address>>;

    // -- Products --

    /// Creates a product. Fails with `Duplicate` if the slug is taken.
    async fn create_product(&self, new: NewProduct) -> Result<Product>;

    /// Finds a product by internal id.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Finds a product by unique slug.
    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<Product>>;

    /// Lists all products in creation order.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Replaces a product row. Fails with `NotFound` if it does not exist.
    async fn update_product(&self, product: Product) -> Result<()>;

    // -- Orders --

    /// Persists an order together with its items.
    ///
    /// The write is atomic: either the order row and every item row are
    /// stored, or nothing is. Fails with `Duplicate` if the order number
    /// collides.
    async fn insert_order(&self, order: Order) -> Result<()>;

    /// Loads an order with its items.
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Loads an order by its customer-facing order number.
    async fn find_order_by_number(&self, order_number: &str) -> Result<Option<Order>>;

    /// Lists a user's orders, newest first.
    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Streams all orders, newest first.
    async fn stream_orders(&self) -> Result<OrderStream>;

    /// Sets the fulfillment status of an order.
    ///
    /// Transition legality is the caller's responsibility; this is a plain
    /// write. Fails with `NotFound` if the order does not exist.
    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()>;

    /// Atomically applies the paid transition if payment is still pending.
    ///
    /// Sets status to `Confirmed`, payment status to `Paid`, and records
    /// the gateway payment id, but only when the current payment status is
    /// `Pending`. Returns true if the transition was applied, false if
    /// another caller already applied it. Fails with `NotFound` if the
    /// order does not exist.
    async fn mark_order_paid(&self, id: OrderId, payment_id: &str) -> Result<bool>;
}
