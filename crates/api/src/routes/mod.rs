pub mod checkout;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod payment;
pub mod products;

use ::checkout::{CheckoutCoordinator, RecordingFulfillment};
use gateway::PaymentGateway;
use store::Store;

use crate::session::InMemorySessions;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store, G: PaymentGateway> {
    pub checkout: CheckoutCoordinator<S, G, RecordingFulfillment>,
    pub store: S,
    pub sessions: InMemorySessions,
}
