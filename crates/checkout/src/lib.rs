//! Checkout flow for the storefront.
//!
//! Provides the typed boundary commands, the order builder/lifecycle
//! service, and the coordinator that sequences order creation, the
//! payment-gateway handoff, and callback verification with an idempotent
//! paid transition.

pub mod commands;
pub mod coordinator;
pub mod error;
pub mod fulfillment;
pub mod orders;

pub use commands::{CheckoutLine, PlaceOrder, ShippingDetails, ShopperDetails, VerifyPayment};
pub use coordinator::{CheckoutCoordinator, PlacedOrder, VerificationOutcome};
pub use error::{CheckoutError, Result};
pub use fulfillment::{FulfillmentNotifier, RecordingFulfillment};
pub use orders::OrderService;
