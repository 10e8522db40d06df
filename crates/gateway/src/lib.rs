//! Payment gateway adapter for the storefront.
//!
//! Wraps the hosted payment provider behind a small trait (order creation
//! against an amount and an idempotent receipt) and provides the HMAC
//! verification of payment-completion callbacks.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod rest;
pub mod signature;

pub use error::{GatewayError, Result};
pub use gateway::{GatewayOrder, GatewayOrderRequest, PaymentGateway};
pub use memory::InMemoryGateway;
pub use rest::RestGateway;
