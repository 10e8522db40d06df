//! Order builder and order lifecycle service.

use std::sync::Arc;

use chrono::Utc;
use common::{AddressId, OrderId, UserId};
use domain::{
    Order, OrderItem, OrderNumber, OrderStatus, PaymentStatus, PricingPolicy,
};
use store::{Store, StoreError};

use crate::commands::PlaceOrder;
use crate::error::{CheckoutError, Result};

/// How many fresh order numbers to try when the uniqueness constraint
/// reports a collision.
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 3;

/// Service for building and managing orders.
///
/// Turns a validated cart snapshot into a persisted order, and applies
/// lifecycle transitions with state-machine checks.
pub struct OrderService<S: Store> {
    store: S,
    pricing: Arc<dyn PricingPolicy>,
}

impl<S: Store> OrderService<S> {
    /// Creates a new order service with the given store and pricing policy.
    pub fn new(store: S, pricing: Arc<dyn PricingPolicy>) -> Self {
        Self { store, pricing }
    }

    /// Builds and persists an order from a validated checkout command.
    ///
    /// Prices come from the snapshot in the command. The order and its
    /// items are written atomically; an order-number collision is retried
    /// with a fresh random suffix. The result is PENDING/PENDING.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %user_id))]
    pub async fn create_order(
        &self,
        cmd: &PlaceOrder,
        user_id: UserId,
        shipping_address_id: AddressId,
    ) -> Result<Order> {
        let items: Vec<OrderItem> = cmd
            .lines
            .iter()
            .map(|l| OrderItem::new(l.product_id, l.quantity, l.unit_price))
            .collect();

        let subtotal = cmd.subtotal();
        let tax = self.pricing.tax(subtotal);
        let shipping_cost = self.pricing.shipping_cost(subtotal);
        let total = subtotal + tax + shipping_cost;

        let mut attempts = 0;
        loop {
            let order = Order {
                id: OrderId::new(),
                order_number: OrderNumber::generate(),
                user_id,
                shipping_address_id: Some(shipping_address_id),
                subtotal,
                tax,
                shipping_cost,
                total,
                status: OrderStatus::Pending,
                payment_status: PaymentStatus::Pending,
                payment_method: cmd.payment_method,
                payment_id: None,
                items: items.clone(),
                created_at: Utc::now(),
            };

            match self.store.insert_order(order.clone()).await {
                Ok(()) => {
                    metrics::counter!("checkout_orders_created_total").increment(1);
                    tracing::info!(
                        order_id = %order.id,
                        order_number = %order.order_number,
                        total_paise = order.total.paise(),
                        "order created"
                    );
                    return Ok(order);
                }
                Err(e @ StoreError::Duplicate { .. }) if attempts < MAX_ORDER_NUMBER_ATTEMPTS => {
                    attempts += 1;
                    tracing::warn!(attempt = attempts, error = %e, "order number collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Loads an order by ID.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.store.find_order(order_id).await?)
    }

    /// Loads an order, failing if it does not exist.
    pub async fn require_order(&self, order_id: OrderId) -> Result<Order> {
        self.get_order(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(order_id))
    }

    /// Applies the conditional paid transition.
    ///
    /// Returns true if this call performed the transition, false if the
    /// order was already paid.
    pub async fn confirm_payment(&self, order_id: OrderId, payment_id: &str) -> Result<bool> {
        Ok(self.store.mark_order_paid(order_id, payment_id).await?)
    }

    /// Moves an order to `target`, enforcing the status state machine.
    #[tracing::instrument(skip(self))]
    pub async fn advance_status(&self, order_id: OrderId, target: OrderStatus) -> Result<Order> {
        let order = self.require_order(order_id).await?;

        if !order.status.can_transition_to(target) {
            return Err(CheckoutError::InvalidTransition {
                from: order.status,
                to: target,
            });
        }

        self.store.update_order_status(order_id, target).await?;
        tracing::info!(%order_id, from = %order.status, to = %target, "order status updated");
        self.require_order(order_id).await
    }

    /// Cancels an order; allowed from any pre-shipment state.
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        self.advance_status(order_id, OrderStatus::Cancelled).await
    }
}
