//! Checkout coordinator.
//!
//! Sequences cart snapshot → order creation → gateway order → hosted
//! payment UI → signature verification → paid transition. The two HTTP
//! requests driving this flow (placement and verification) are not
//! atomically linked; the order row is the only shared state between
//! them, and the paid transition is a conditional update so replayed or
//! racing verifications apply at most once.

use std::sync::Arc;

use common::OrderId;
use domain::{Order, OrderStatus, PaymentMethod, PricingPolicy};
use gateway::{GatewayOrderRequest, PaymentGateway, signature};
use store::{NewAddress, NewUser, Store};

use crate::commands::{PlaceOrder, VerifyPayment};
use crate::error::{CheckoutError, Result};
use crate::fulfillment::FulfillmentNotifier;
use crate::orders::OrderService;

/// Result of a successful order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// Internal order identifier.
    pub order_id: OrderId,

    /// Customer-facing order reference.
    pub order_number: String,

    /// Gateway order handle for the hosted payment UI; `None` for COD.
    pub gateway_order_id: Option<String>,
}

/// Outcome of a payment verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// This call applied the paid transition.
    Confirmed,

    /// The order was already paid; no side effects were repeated.
    AlreadyConfirmed,
}

/// Orchestrates the checkout flow against the store and the gateway.
pub struct CheckoutCoordinator<S, G, F>
where
    S: Store,
    G: PaymentGateway,
    F: FulfillmentNotifier,
{
    store: S,
    orders: OrderService<S>,
    gateway: G,
    fulfillment: F,
    gateway_secret: String,
    currency: String,
}

impl<S, G, F> CheckoutCoordinator<S, G, F>
where
    S: Store + Clone,
    G: PaymentGateway,
    F: FulfillmentNotifier,
{
    /// Creates a new coordinator.
    pub fn new(
        store: S,
        gateway: G,
        fulfillment: F,
        pricing: Arc<dyn PricingPolicy>,
        gateway_secret: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        let orders = OrderService::new(store.clone(), pricing);
        Self {
            store,
            orders,
            gateway,
            fulfillment,
            gateway_secret: gateway_secret.into(),
            currency: currency.into(),
        }
    }

    /// Returns the order lifecycle service.
    pub fn orders(&self) -> &OrderService<S> {
        &self.orders
    }

    /// Places an order from a cart snapshot.
    ///
    /// Validation failures abort before any persistence; no gateway order
    /// is ever created for a cart that failed local validation. For ONLINE
    /// payment the gateway amount is the just-persisted total in minor
    /// units: the local order is the single source of truth for the
    /// charged amount. A gateway failure leaves the order PENDING/PENDING
    /// and surfaces a retryable error carrying the order id.
    #[tracing::instrument(skip(self, cmd), fields(payment_method = %cmd.payment_method))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<PlacedOrder> {
        metrics::counter!("checkout_attempts_total").increment(1);
        cmd.validate()?;

        let user_id = self.resolve_user(&cmd).await?;
        let address = self
            .store
            .create_address(NewAddress {
                user_id,
                full_name: cmd.shopper.full_name(),
                phone: cmd.shopper.phone.clone(),
                line1: cmd.shipping.address.clone(),
                city: cmd.shipping.city.clone(),
                state: cmd.shipping.state.clone(),
                pincode: cmd.shipping.pincode.clone(),
                country: "India".to_string(),
            })
            .await?;

        let order = self.orders.create_order(&cmd, user_id, address.id).await?;

        let gateway_order_id = match cmd.payment_method {
            PaymentMethod::Online => Some(self.request_gateway_order(&order).await?),
            PaymentMethod::Cod => {
                // No gateway and no payment UI: the order is confirmed
                // immediately and payment stays pending until delivery.
                self.orders
                    .advance_status(order.id, OrderStatus::Confirmed)
                    .await?;
                None
            }
        };

        Ok(PlacedOrder {
            order_id: order.id,
            order_number: order.order_number.to_string(),
            gateway_order_id,
        })
    }

    /// Re-requests a gateway order for an order still awaiting payment.
    ///
    /// Uses the same receipt (the order id), so the gateway deduplicates
    /// and the shopper can never be double-charged by retrying.
    #[tracing::instrument(skip(self))]
    pub async fn retry_payment(&self, order_id: OrderId) -> Result<PlacedOrder> {
        let order = self.orders.require_order(order_id).await?;

        if !order.awaiting_online_payment() {
            return Err(CheckoutError::NotAwaitingPayment(order_id));
        }

        let gateway_order_id = self.request_gateway_order(&order).await?;
        Ok(PlacedOrder {
            order_id: order.id,
            order_number: order.order_number.to_string(),
            gateway_order_id: Some(gateway_order_id),
        })
    }

    /// Verifies a payment-completion callback and applies the paid
    /// transition.
    ///
    /// A signature mismatch performs no state change. A valid callback
    /// transitions the order to CONFIRMED/PAID at most once; replays
    /// report `AlreadyConfirmed` and trigger no duplicate fulfillment.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn verify_payment(&self, cmd: VerifyPayment) -> Result<VerificationOutcome> {
        let order = self.orders.require_order(cmd.order_id).await?;

        if !signature::verify(
            &self.gateway_secret,
            &cmd.gateway_order_id,
            &cmd.gateway_payment_id,
            &cmd.signature,
        ) {
            metrics::counter!("payment_signature_mismatches_total").increment(1);
            tracing::warn!(
                order_id = %order.id,
                gateway_order_id = %cmd.gateway_order_id,
                "payment signature mismatch"
            );
            return Err(CheckoutError::SignatureMismatch(order.id));
        }

        let applied = self
            .orders
            .confirm_payment(order.id, &cmd.gateway_payment_id)
            .await?;

        if applied {
            metrics::counter!("payments_confirmed_total").increment(1);
            tracing::info!(order_id = %order.id, "payment verified, order confirmed");
            self.fulfillment
                .order_confirmed(order.id, &cmd.gateway_payment_id)
                .await;
            Ok(VerificationOutcome::Confirmed)
        } else {
            tracing::info!(order_id = %order.id, "payment already confirmed, verification replay ignored");
            Ok(VerificationOutcome::AlreadyConfirmed)
        }
    }

    /// Finds the shopper's account, creating a guest account keyed by
    /// email when none exists.
    async fn resolve_user(&self, cmd: &PlaceOrder) -> Result<common::UserId> {
        if let Some(user_id) = cmd.user_id {
            return Ok(user_id);
        }

        if let Some(user) = self.store.find_user_by_email(&cmd.shopper.email).await? {
            return Ok(user.id);
        }

        let user = self
            .store
            .create_user(NewUser {
                email: cmd.shopper.email.clone(),
                name: cmd.shopper.full_name(),
                phone: Some(cmd.shopper.phone.clone()),
                role: domain::Role::Customer,
            })
            .await?;
        Ok(user.id)
    }

    async fn request_gateway_order(&self, order: &Order) -> Result<String> {
        let request = GatewayOrderRequest {
            amount_minor: order.total.paise(),
            currency: self.currency.clone(),
            receipt: order.id.to_string(),
        };

        match self.gateway.create_order(request).await {
            Ok(gateway_order) => {
                tracing::debug!(
                    order_id = %order.id,
                    gateway_order_id = %gateway_order.id,
                    amount_minor = order.total.paise(),
                    "gateway order created"
                );
                Ok(gateway_order.id)
            }
            Err(e) => {
                metrics::counter!("gateway_order_failures_total").increment(1);
                tracing::warn!(order_id = %order.id, error = %e, "gateway order creation failed");
                Err(CheckoutError::Gateway {
                    order_id: order.id,
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CheckoutLine, ShippingDetails, ShopperDetails};
    use crate::fulfillment::RecordingFulfillment;
    use common::ProductId;
    use domain::{Money, NoCharges, PaymentStatus, Role};
    use gateway::InMemoryGateway;
    use store::InMemoryStore;

    const SECRET: &str = "secret_placeholder";

    fn setup() -> (
        CheckoutCoordinator<InMemoryStore, InMemoryGateway, RecordingFulfillment>,
        InMemoryStore,
        InMemoryGateway,
        RecordingFulfillment,
    ) {
        let store = InMemoryStore::new();
        let gateway = InMemoryGateway::new();
        let fulfillment = RecordingFulfillment::new();

        let coordinator = CheckoutCoordinator::new(
            store.clone(),
            gateway.clone(),
            fulfillment.clone(),
            Arc::new(NoCharges),
            SECRET,
            "INR",
        );

        (coordinator, store, gateway, fulfillment)
    }

    fn online_command(lines: Vec<CheckoutLine>) -> PlaceOrder {
        PlaceOrder {
            shopper: ShopperDetails {
                first_name: "Asha".to_string(),
                last_name: "Verma".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
            },
            shipping: ShippingDetails {
                address: "14 MG Road".to_string(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "411001".to_string(),
            },
            payment_method: PaymentMethod::Online,
            lines,
            user_id: None,
            claimed_total: None,
        }
    }

    fn line(quantity: u32, price: Money) -> CheckoutLine {
        CheckoutLine {
            product_id: ProductId::new(),
            quantity,
            unit_price: price,
        }
    }

    fn verify_command(placed: &PlacedOrder, payment_id: &str) -> VerifyPayment {
        let gateway_order_id = placed.gateway_order_id.clone().unwrap();
        let signature = signature::sign(SECRET, &gateway_order_id, payment_id);
        VerifyPayment {
            order_id: placed.order_id,
            gateway_order_id,
            gateway_payment_id: payment_id.to_string(),
            signature,
        }
    }

    #[tokio::test]
    async fn test_online_happy_path() {
        let (coordinator, store, gateway, fulfillment) = setup();

        // ₹4500 × 2 → total ₹9000 → 900 000 paise at the gateway.
        let placed = coordinator
            .place_order(online_command(vec![line(2, Money::from_rupees(4500))]))
            .await
            .unwrap();

        let order = store.find_order(placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total, Money::from_rupees(9000));
        assert_eq!(
            gateway.amount_for_receipt(&placed.order_id.to_string()),
            Some(900_000)
        );

        let outcome = coordinator
            .verify_payment(verify_command(&placed, "pay_001"))
            .await
            .unwrap();
        assert_eq!(outcome, VerificationOutcome::Confirmed);

        let order = store.find_order(placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.payment_id.as_deref(), Some("pay_001"));
        assert_eq!(fulfillment.notification_count(), 1);
    }

    #[tokio::test]
    async fn test_corrupted_signature_changes_nothing() {
        let (coordinator, store, _gateway, fulfillment) = setup();

        let placed = coordinator
            .place_order(online_command(vec![line(2, Money::from_rupees(4500))]))
            .await
            .unwrap();

        let mut cmd = verify_command(&placed, "pay_001");
        // Deliberately corrupt one character of the signature.
        let mut corrupted: Vec<char> = cmd.signature.chars().collect();
        corrupted[0] = if corrupted[0] == '0' { '1' } else { '0' };
        cmd.signature = corrupted.into_iter().collect();

        let err = coordinator.verify_payment(cmd).await.unwrap_err();
        assert!(matches!(err, CheckoutError::SignatureMismatch(_)));

        let order = store.find_order(placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.payment_id.is_none());
        assert_eq!(fulfillment.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_verification_is_idempotent() {
        let (coordinator, _store, _gateway, fulfillment) = setup();

        let placed = coordinator
            .place_order(online_command(vec![line(1, Money::from_paise(1000))]))
            .await
            .unwrap();

        let cmd = verify_command(&placed, "pay_001");
        let first = coordinator.verify_payment(cmd.clone()).await.unwrap();
        let second = coordinator.verify_payment(cmd).await.unwrap();

        assert_eq!(first, VerificationOutcome::Confirmed);
        assert_eq!(second, VerificationOutcome::AlreadyConfirmed);
        assert_eq!(fulfillment.notification_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_persists_nothing() {
        let (coordinator, store, gateway, _fulfillment) = setup();

        let err = coordinator
            .place_order(online_command(vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.user_count().await, 0);
        assert_eq!(gateway.order_count(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_leaves_order_pending() {
        let (coordinator, store, gateway, _fulfillment) = setup();
        gateway.set_fail_on_create(true);

        let err = coordinator
            .place_order(online_command(vec![line(1, Money::from_paise(1000))]))
            .await
            .unwrap_err();

        let CheckoutError::Gateway { order_id, .. } = err else {
            panic!("expected gateway error, got {err:?}");
        };

        let order = store.find_order(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_retry_payment_reuses_receipt() {
        let (coordinator, _store, gateway, _fulfillment) = setup();
        gateway.set_fail_on_create(true);

        let err = coordinator
            .place_order(online_command(vec![line(1, Money::from_paise(1000))]))
            .await
            .unwrap_err();
        let CheckoutError::Gateway { order_id, .. } = err else {
            panic!("expected gateway error, got {err:?}");
        };

        gateway.set_fail_on_create(false);
        let first = coordinator.retry_payment(order_id).await.unwrap();
        let second = coordinator.retry_payment(order_id).await.unwrap();

        // Same receipt, same gateway order, exactly one gateway-side order.
        assert_eq!(first.gateway_order_id, second.gateway_order_id);
        assert_eq!(gateway.order_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_payment_rejected_after_confirmation() {
        let (coordinator, _store, _gateway, _fulfillment) = setup();

        let placed = coordinator
            .place_order(online_command(vec![line(1, Money::from_paise(1000))]))
            .await
            .unwrap();
        coordinator
            .verify_payment(verify_command(&placed, "pay_001"))
            .await
            .unwrap();

        let err = coordinator.retry_payment(placed.order_id).await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotAwaitingPayment(_)));
    }

    #[tokio::test]
    async fn test_cod_skips_gateway_and_confirms() {
        let (coordinator, store, gateway, _fulfillment) = setup();

        let mut cmd = online_command(vec![line(1, Money::from_paise(1000))]);
        cmd.payment_method = PaymentMethod::Cod;

        let placed = coordinator.place_order(cmd).await.unwrap();
        assert!(placed.gateway_order_id.is_none());
        assert_eq!(gateway.order_count(), 0);

        let order = store.find_order(placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_guest_user_created_once() {
        let (coordinator, store, _gateway, _fulfillment) = setup();

        coordinator
            .place_order(online_command(vec![line(1, Money::from_paise(1000))]))
            .await
            .unwrap();
        coordinator
            .place_order(online_command(vec![line(1, Money::from_paise(2000))]))
            .await
            .unwrap();

        assert_eq!(store.user_count().await, 1);
        let user = store
            .find_user_by_email("asha@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "Asha Verma");
    }

    #[tokio::test]
    async fn test_authenticated_user_is_reused() {
        let (coordinator, store, _gateway, _fulfillment) = setup();

        let user = store
            .create_user(store::NewUser {
                email: "account@example.com".to_string(),
                name: "Account Holder".to_string(),
                phone: None,
                role: Role::Customer,
            })
            .await
            .unwrap();

        let mut cmd = online_command(vec![line(1, Money::from_paise(1000))]);
        cmd.user_id = Some(user.id);

        let placed = coordinator.place_order(cmd).await.unwrap();
        let order = store.find_order(placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.user_id, user.id);
        // No guest account was created alongside the session user.
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_verify_unknown_order() {
        let (coordinator, _store, _gateway, _fulfillment) = setup();

        let err = coordinator
            .verify_payment(VerifyPayment {
                order_id: OrderId::new(),
                gateway_order_id: "order_000001".to_string(),
                gateway_payment_id: "pay_001".to_string(),
                signature: "00".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::OrderNotFound(_)));
    }
}
