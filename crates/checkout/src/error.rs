//! Checkout error taxonomy.
//!
//! Every failure below the coordinator is translated into one of these
//! kinds before it reaches the shopper-facing layer; gateway-internal and
//! database error shapes never leak outward.

use common::OrderId;
use domain::OrderStatus;
use gateway::GatewayError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The command failed validation; nothing was persisted.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The requested status change is not legal from the current state.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The order is not awaiting an online payment.
    #[error("Order {0} is not awaiting online payment")]
    NotAwaitingPayment(OrderId),

    /// The gateway call failed after the local order was persisted.
    ///
    /// The order remains PENDING/PENDING; retrying with the same order
    /// reuses the same gateway receipt and cannot double-charge.
    #[error("Payment gateway error for order {order_id}: {source}")]
    Gateway {
        order_id: OrderId,
        #[source]
        source: GatewayError,
    },

    /// The payment callback signature did not verify.
    ///
    /// Security-relevant rejection: logged, never retried automatically,
    /// and the order stays unpaid.
    #[error("Payment signature mismatch for order {0}")]
    SignatureMismatch(OrderId),

    /// A data store error occurred.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
