use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{AddressId, OrderId, ProductId, UserId};
use domain::{Address, Order, OrderStatus, PaymentStatus, Product, User};
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    store::{NewAddress, NewProduct, NewUser, OrderStream, Store},
};

#[derive(Debug, Default)]
struct InMemoryState {
    users: Vec<User>,
    addresses: HashMap<AddressId, Address>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

/// In-memory store implementation for tests and local development.
///
/// Provides the same interface and constraint behavior as the PostgreSQL
/// implementation, including unique-key violations and the conditional
/// paid transition.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the total number of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = InMemoryState::default();
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }

        let user = User {
            id: UserId::new(),
            email: new.email,
            name: new.name,
            phone: new.phone,
            role: new.role,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_address(&self, new: NewAddress) -> Result<Address> {
        let mut state = self.state.write().await;
        let address = Address {
            id: AddressId::new(),
            user_id: new.user_id,
            full_name: new.full_name,
            phone: new.phone,
            line1: new.line1,
            city: new.city,
            state: new.state,
            pincode: new.pincode,
            country: new.country,
        };
        state.addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn find_address(&self, id: AddressId) -> Result<Option<Address>> {
        let state = self.state.read().await;
        Ok(state.addresses.get(&id).cloned())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;

        if state.products.iter().any(|p| p.slug == new.slug) {
            return Err(StoreError::Duplicate {
                constraint: "products_slug_key".to_string(),
            });
        }

        let product = Product {
            id: ProductId::new(),
            name: new.name,
            slug: new.slug,
            price: new.price,
            stock: new.stock,
            active: new.active,
            created_at: Utc::now(),
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state.products.clone())
    }

    async fn update_product(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().await;
        match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "product",
                id: product.id.to_string(),
            }),
        }
    }

    async fn insert_order(&self, order: Order) -> Result<()> {
        let mut state = self.state.write().await;

        // Unique constraint simulation; nothing is stored on violation,
        // matching the transactional all-or-nothing write.
        if state
            .orders
            .iter()
            .any(|o| o.order_number == order.order_number)
        {
            return Err(StoreError::Duplicate {
                constraint: "orders_order_number_key".to_string(),
            });
        }

        state.orders.push(order);
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .iter()
            .find(|o| o.order_number.as_str() == order_number)
            .cloned())
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn stream_orders(&self) -> Result<OrderStream> {
        use futures_util::stream;

        let state = self.state.read().await;
        let mut orders = state.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let stream = stream::iter(orders.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()> {
        let mut state = self.state.write().await;
        match state.orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "order",
                id: id.to_string(),
            }),
        }
    }

    async fn mark_order_paid(&self, id: OrderId, payment_id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "order",
                id: id.to_string(),
            })?;

        if order.payment_status != PaymentStatus::Pending {
            return Ok(false);
        }

        order.status = OrderStatus::Confirmed;
        order.payment_status = PaymentStatus::Paid;
        order.payment_id = Some(payment_id.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{Money, OrderItem, OrderNumber, PaymentMethod, Role};

    fn test_order(number: &str) -> Order {
        let items = vec![OrderItem::new(ProductId::new(), 2, Money::from_paise(1000))];
        let subtotal: Money = items.iter().map(OrderItem::line_subtotal).sum();
        Order {
            id: OrderId::new(),
            order_number: OrderNumber::from_string(number),
            user_id: UserId::new(),
            shipping_address_id: None,
            subtotal,
            tax: Money::zero(),
            shipping_cost: Money::zero(),
            total: subtotal,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Online,
            payment_id: None,
            items,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let store = InMemoryStore::new();
        let user = store
            .create_user(NewUser {
                email: "shopper@example.com".to_string(),
                name: "Shopper".to_string(),
                phone: None,
                role: Role::Customer,
            })
            .await
            .unwrap();

        let by_id = store.find_user(user.id).await.unwrap();
        assert_eq!(by_id, Some(user.clone()));

        let by_email = store.find_user_by_email("shopper@example.com").await.unwrap();
        assert_eq!(by_email, Some(user));
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = InMemoryStore::new();
        let new = NewUser {
            email: "shopper@example.com".to_string(),
            name: "Shopper".to_string(),
            phone: None,
            role: Role::Customer,
        };
        store.create_user(new.clone()).await.unwrap();

        let result = store.create_user(new).await;
        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
        assert!(result.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn duplicate_slug_rejected() {
        let store = InMemoryStore::new();
        let new = NewProduct {
            name: "Glossy Tile".to_string(),
            slug: "glossy-tile".to_string(),
            price: Money::from_paise(45_000),
            stock: 10,
            active: true,
        };
        store.create_product(new.clone()).await.unwrap();

        let result = store.create_product(new).await;
        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn insert_and_find_order() {
        let store = InMemoryStore::new();
        let order = test_order("ORD-1-AAAAAA");
        let id = order.id;
        store.insert_order(order.clone()).await.unwrap();

        let found = store.find_order(id).await.unwrap().unwrap();
        assert_eq!(found, order);
        assert_eq!(found.items.len(), 1);

        let by_number = store
            .find_order_by_number("ORD-1-AAAAAA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_number.id, id);
    }

    #[tokio::test]
    async fn duplicate_order_number_rejected() {
        let store = InMemoryStore::new();
        store.insert_order(test_order("ORD-1-AAAAAA")).await.unwrap();

        let result = store.insert_order(test_order("ORD-1-AAAAAA")).await;
        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn mark_order_paid_applies_once() {
        let store = InMemoryStore::new();
        let order = test_order("ORD-1-AAAAAA");
        let id = order.id;
        store.insert_order(order).await.unwrap();

        let first = store.mark_order_paid(id, "pay_001").await.unwrap();
        assert!(first);

        let second = store.mark_order_paid(id, "pay_002").await.unwrap();
        assert!(!second);

        let order = store.find_order(id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.payment_id.as_deref(), Some("pay_001"));
    }

    #[tokio::test]
    async fn mark_order_paid_missing_order() {
        let store = InMemoryStore::new();
        let result = store.mark_order_paid(OrderId::new(), "pay_001").await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_order_status() {
        let store = InMemoryStore::new();
        let order = test_order("ORD-1-AAAAAA");
        let id = order.id;
        store.insert_order(order).await.unwrap();

        store
            .update_order_status(id, OrderStatus::Cancelled)
            .await
            .unwrap();
        let order = store.find_order(id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn list_orders_for_user_newest_first() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();

        let mut first = test_order("ORD-1-AAAAAA");
        first.user_id = user_id;
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        let mut second = test_order("ORD-2-BBBBBB");
        second.user_id = user_id;

        store.insert_order(first.clone()).await.unwrap();
        store.insert_order(second.clone()).await.unwrap();
        store.insert_order(test_order("ORD-3-CCCCCC")).await.unwrap();

        let orders = store.list_orders_for_user(user_id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[tokio::test]
    async fn stream_orders_returns_all() {
        use futures_util::StreamExt;

        let store = InMemoryStore::new();
        store.insert_order(test_order("ORD-1-AAAAAA")).await.unwrap();
        store.insert_order(test_order("ORD-2-BBBBBB")).await.unwrap();

        let stream = store.stream_orders().await.unwrap();
        let orders: Vec<_> = stream.collect().await;
        assert_eq!(orders.len(), 2);
    }

    #[tokio::test]
    async fn update_product() {
        let store = InMemoryStore::new();
        let mut product = store
            .create_product(NewProduct {
                name: "Glossy Tile".to_string(),
                slug: "glossy-tile".to_string(),
                price: Money::from_paise(45_000),
                stock: 10,
                active: true,
            })
            .await
            .unwrap();

        product.price = Money::from_paise(50_000);
        product.stock = 8;
        store.update_product(product.clone()).await.unwrap();

        let found = store.find_product(product.id).await.unwrap().unwrap();
        assert_eq!(found.price, Money::from_paise(50_000));
        assert_eq!(found.stock, 8);
    }
}
