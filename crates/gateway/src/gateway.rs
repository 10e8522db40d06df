use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Request for a gateway-side order.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrderRequest {
    /// Amount in the gateway's minor unit (paise). Already an integer;
    /// fractional currency never crosses this boundary as a float.
    pub amount_minor: i64,

    /// ISO currency code (e.g., "INR").
    pub currency: String,

    /// Caller-supplied idempotency key, the local order id. Re-requesting
    /// with the same receipt must not create a second gateway order.
    pub receipt: String,
}

/// A gateway-side order handle tied to an amount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    /// The gateway's order identifier.
    pub id: String,
}

/// Trait for payment gateway order creation.
///
/// The gateway is opaque beyond amount/currency/receipt in and order id
/// out; signature verification of the completion callback is a local
/// computation (see [`crate::signature`]) and needs no gateway call.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a gateway order for the given amount.
    ///
    /// On failure the caller must assume no payment occurred and leave its
    /// local order unchanged.
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder>;
}
