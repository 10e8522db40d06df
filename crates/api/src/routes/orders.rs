//! Order read and back-office endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use common::OrderId;
use domain::{Order, OrderStatus};
use futures_util::TryStreamExt;
use gateway::PaymentGateway;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;
use crate::session::{require_admin, session_from_headers};

use super::AppState;

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub user_id: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub subtotal_paise: i64,
    pub tax_paise: i64,
    pub shipping_cost_paise: i64,
    pub total_paise: i64,
    pub payment_id: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_paise: i64,
    pub subtotal_paise: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            id: order.id.to_string(),
            order_number: order.order_number.to_string(),
            user_id: order.user_id.to_string(),
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_method: order.payment_method.to_string(),
            subtotal_paise: order.subtotal.paise(),
            tax_paise: order.tax.paise(),
            shipping_cost_paise: order.shipping_cost.paise(),
            total_paise: order.total.paise(),
            payment_id: order.payment_id.clone(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    quantity: item.quantity,
                    unit_price_paise: item.unit_price.paise(),
                    subtotal_paise: item.line_subtotal().paise(),
                })
                .collect(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// -- Handlers --

/// GET /orders/{id} — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state
        .checkout
        .orders()
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(OrderResponse::from(&order)))
}

/// GET /my/orders — the authenticated shopper's orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn mine<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let session = session_from_headers(&state.sessions, &headers)
        .await
        .ok_or(ApiError::Unauthorized)?;

    let orders = state.store.list_orders_for_user(session.user_id).await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /orders — all orders for the back-office, newest first. ADMIN only.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    require_admin(&state.sessions, &headers).await?;

    let orders: Vec<Order> = state.store.stream_orders().await?.try_collect().await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// POST /orders/{id}/status — move an order through its lifecycle. ADMIN only.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_status<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    require_admin(&state.sessions, &headers).await?;

    let order_id = parse_order_id(&id)?;
    let target: OrderStatus = req
        .status
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("{e}")))?;

    let order = state.checkout.orders().advance_status(order_id, target).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/cancel — cancel a pre-shipment order. ADMIN only.
#[tracing::instrument(skip(state, headers))]
pub async fn cancel<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    require_admin(&state.sessions, &headers).await?;

    let order_id = parse_order_id(&id)?;
    let order = state.checkout.orders().cancel_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

pub(crate) fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
