//! Fulfillment notification port.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;

/// Downstream side effect fired when an order's payment is confirmed.
///
/// The coordinator guarantees at most one notification per order: the
/// notifier runs only when the conditional paid transition was actually
/// applied, so a replayed verification callback cannot trigger duplicate
/// fulfillment.
#[async_trait]
pub trait FulfillmentNotifier: Send + Sync {
    /// Called exactly once when an order transitions to paid.
    async fn order_confirmed(&self, order_id: OrderId, payment_id: &str);
}

/// Records notifications in memory; used in tests and as the default
/// wiring until a real fulfillment queue is attached.
#[derive(Debug, Clone, Default)]
pub struct RecordingFulfillment {
    notifications: Arc<RwLock<Vec<(OrderId, String)>>>,
}

impl RecordingFulfillment {
    /// Creates a new recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of notifications received.
    pub fn notification_count(&self) -> usize {
        self.notifications.read().unwrap().len()
    }

    /// Returns the notifications received so far.
    pub fn notifications(&self) -> Vec<(OrderId, String)> {
        self.notifications.read().unwrap().clone()
    }
}

#[async_trait]
impl FulfillmentNotifier for RecordingFulfillment {
    async fn order_confirmed(&self, order_id: OrderId, payment_id: &str) {
        self.notifications
            .write()
            .unwrap()
            .push((order_id, payment_id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_notifications() {
        let recorder = RecordingFulfillment::new();
        let order_id = OrderId::new();

        recorder.order_confirmed(order_id, "pay_001").await;

        assert_eq!(recorder.notification_count(), 1);
        assert_eq!(
            recorder.notifications(),
            vec![(order_id, "pay_001".to_string())]
        );
    }
}
