//! Payment verification endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use checkout::{VerificationOutcome, VerifyPayment};
use gateway::PaymentGateway;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;

use super::AppState;

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub order_id: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub already_confirmed: bool,
}

/// POST /payment/verify — verify a payment-completion callback.
///
/// A signature mismatch answers 400 and performs no state change; a
/// replayed valid callback answers 200 with `already_confirmed = true`.
#[tracing::instrument(skip(state, req))]
pub async fn verify<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let order_id = super::orders::parse_order_id(&req.order_id)?;

    let outcome = state
        .checkout
        .verify_payment(VerifyPayment {
            order_id,
            gateway_order_id: req.gateway_order_id,
            gateway_payment_id: req.gateway_payment_id,
            signature: req.signature,
        })
        .await?;

    Ok(Json(VerifyResponse {
        success: true,
        already_confirmed: outcome == VerificationOutcome::AlreadyConfirmed,
    }))
}
