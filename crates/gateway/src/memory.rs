//! In-memory payment gateway for tests and local development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::gateway::{GatewayOrder, GatewayOrderRequest, PaymentGateway};
use crate::Result;

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    // Keyed by receipt: repeated creation for the same receipt returns the
    // original order instead of minting a duplicate.
    orders_by_receipt: HashMap<String, (GatewayOrder, i64)>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory gateway with receipt-idempotent order creation and failure
/// injection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryGateway {
    /// Creates a new in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail order creation.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of distinct gateway orders created.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders_by_receipt.len()
    }

    /// Returns the amount requested for a receipt, if an order exists.
    pub fn amount_for_receipt(&self, receipt: &str) -> Option<i64> {
        self.state
            .read()
            .unwrap()
            .orders_by_receipt
            .get(receipt)
            .map(|(_, amount)| *amount)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(GatewayError::Declined(
                "gateway unavailable".to_string(),
            ));
        }

        if let Some((order, _)) = state.orders_by_receipt.get(&request.receipt) {
            return Ok(order.clone());
        }

        state.next_id += 1;
        let order = GatewayOrder {
            id: format!("order_{:06}", state.next_id),
        };
        state
            .orders_by_receipt
            .insert(request.receipt, (order.clone(), request.amount_minor));

        Ok(order)
    }
}
