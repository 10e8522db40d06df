//! HTTP client for a hosted payment gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::GatewayError;
use crate::gateway::{GatewayOrder, GatewayOrderRequest, PaymentGateway};
use crate::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// REST client for the hosted gateway's order API.
///
/// Authenticates with the key/secret pair via HTTP basic auth and posts
/// `{amount, currency, receipt}` to `<base_url>/orders`. The gateway
/// deduplicates on the receipt, so retrying a failed call with the same
/// receipt cannot create a second gateway order.
#[derive(Debug, Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RestGateway {
    /// Creates a new REST gateway client.
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url: base_url.into(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RestGateway {
    #[tracing::instrument(skip(self, request), fields(receipt = %request.receipt))]
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder> {
        let url = format!("{}/orders", self.base_url.trim_end_matches('/'));
        let body = CreateOrderBody {
            amount: request.amount_minor,
            currency: &request.currency,
            receipt: &request.receipt,
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gateway rejected order creation");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order = response.json::<GatewayOrder>().await?;
        tracing::debug!(gateway_order_id = %order.id, "gateway order created");
        Ok(order)
    }
}
