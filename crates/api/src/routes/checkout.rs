//! Checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use checkout::{CheckoutLine, PlaceOrder, ShippingDetails, ShopperDetails};
use common::ProductId;
use domain::{Money, PaymentMethod};
use gateway::PaymentGateway;
use serde::{Deserialize, Serialize};
use store::Store;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::session_from_headers;

use super::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub payment_method: PaymentMethod,
    pub items: Vec<CheckoutItemRequest>,
    /// Cart total as displayed to the shopper, in paise.
    #[serde(default)]
    pub total_paise: Option<i64>,
}

#[derive(Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_paise: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
}

// -- Handlers --

/// POST /checkout — place an order from the submitted cart snapshot.
///
/// The loose request body is converted into a typed command before any
/// business logic runs; authenticated shoppers are attached via their
/// session, guests are identified by email.
#[tracing::instrument(skip(state, headers, req))]
pub async fn place<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    headers: HeaderMap,
    Json(req): Json<CheckoutRequest>,
) -> Result<(axum::http::StatusCode, Json<CheckoutResponse>), ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let session = session_from_headers(&state.sessions, &headers).await;
    let cmd = to_command(req, session.map(|s| s.user_id))?;

    let placed = state.checkout.place_order(cmd).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: placed.order_id.to_string(),
            order_number: placed.order_number,
            gateway_order_id: placed.gateway_order_id,
        }),
    ))
}

/// POST /checkout/{id}/retry-payment — request a fresh gateway handoff
/// for an order still awaiting online payment.
#[tracing::instrument(skip(state))]
pub async fn retry_payment<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(id): Path<String>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let order_id = super::orders::parse_order_id(&id)?;
    let placed = state.checkout.retry_payment(order_id).await?;

    Ok(Json(CheckoutResponse {
        order_id: placed.order_id.to_string(),
        order_number: placed.order_number,
        gateway_order_id: placed.gateway_order_id,
    }))
}

fn to_command(
    req: CheckoutRequest,
    user_id: Option<common::UserId>,
) -> Result<PlaceOrder, ApiError> {
    let mut lines = Vec::with_capacity(req.items.len());
    for item in req.items {
        let product_id = Uuid::parse_str(&item.product_id)
            .map_err(|e| ApiError::BadRequest(format!("Invalid product_id: {e}")))?;
        lines.push(CheckoutLine {
            product_id: ProductId::from_uuid(product_id),
            quantity: item.quantity,
            unit_price: Money::from_paise(item.unit_price_paise),
        });
    }

    Ok(PlaceOrder {
        shopper: ShopperDetails {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
        },
        shipping: ShippingDetails {
            address: req.address,
            city: req.city,
            state: req.state,
            pincode: req.pincode,
        },
        payment_method: req.payment_method,
        lines,
        user_id,
        claimed_total: req.total_paise.map(Money::from_paise),
    })
}
