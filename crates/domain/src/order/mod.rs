//! Order and order-item records.

mod number;

use chrono::{DateTime, Utc};
use common::{AddressId, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::status::{OrderStatus, PaymentMethod, PaymentStatus};

pub use number::OrderNumber;

/// A line item on a placed order.
///
/// The unit price is snapshotted at order time and never updated; catalog
/// price changes must not retroactively alter historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product ordered.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit at the time of order.
    pub unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Returns the line subtotal (unit price × quantity).
    pub fn line_subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Durable record of a placed purchase.
///
/// Owns its items (they are written and deleted with the order); references
/// the user and address without owning them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Internal identifier, also used as the gateway receipt.
    pub id: OrderId,

    /// Customer-facing order reference.
    pub order_number: OrderNumber,

    /// The user who placed the order.
    pub user_id: UserId,

    /// Shipping destination, if one was captured.
    pub shipping_address_id: Option<AddressId>,

    /// Sum of line subtotals.
    pub subtotal: Money,

    /// Tax charged on top of the subtotal.
    pub tax: Money,

    /// Shipping charge.
    pub shipping_cost: Money,

    /// Amount charged: subtotal + tax + shipping_cost.
    pub total: Money,

    /// Fulfillment state.
    pub status: OrderStatus,

    /// Payment state.
    pub payment_status: PaymentStatus,

    /// How the shopper chose to pay.
    pub payment_method: PaymentMethod,

    /// Gateway payment identifier, recorded when payment is verified.
    pub payment_id: Option<String>,

    /// Line items in add order.
    pub items: Vec<OrderItem>,

    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total quantity of units across all items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Returns true if `total` equals `subtotal + tax + shipping_cost`
    /// and the subtotal matches the line items.
    pub fn totals_consistent(&self) -> bool {
        let line_sum: Money = self.items.iter().map(OrderItem::line_subtotal).sum();
        line_sum == self.subtotal && self.subtotal + self.tax + self.shipping_cost == self.total
    }

    /// Returns true if the order is still awaiting an online payment.
    pub fn awaiting_online_payment(&self) -> bool {
        self.payment_method == PaymentMethod::Online
            && self.status == OrderStatus::Pending
            && self.payment_status == PaymentStatus::Pending
    }
}
