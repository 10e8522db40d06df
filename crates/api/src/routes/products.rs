//! Catalog endpoints: public reads plus admin CRUD.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use domain::{Money, Product};
use gateway::PaymentGateway;
use serde::{Deserialize, Serialize};
use store::{NewProduct, Store};

use crate::error::ApiError;
use crate::session::require_admin;

use super::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub slug: String,
    pub price_paise: i64,
    pub stock: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price_paise: i64,
    pub stock: u32,
    pub active: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        ProductResponse {
            id: product.id.to_string(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            price_paise: product.price.paise(),
            stock: product.stock,
            active: product.active,
        }
    }
}

// -- Handlers --

/// GET /products — list the catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let products = state.store.list_products().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /products/{id} — load a product by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = state
        .store
        .find_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(ProductResponse::from(&product)))
}

/// GET /products/slug/{slug} — load a product by its storefront slug.
#[tracing::instrument(skip(state))]
pub async fn get_by_slug<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(slug): Path<String>,
) -> Result<Json<ProductResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let product = state
        .store
        .find_product_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {slug} not found")))?;

    Ok(Json(ProductResponse::from(&product)))
}

/// POST /products — create a product. ADMIN only.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    headers: HeaderMap,
    Json(req): Json<ProductRequest>,
) -> Result<(axum::http::StatusCode, Json<ProductResponse>), ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    require_admin(&state.sessions, &headers).await?;

    let product = state
        .store
        .create_product(NewProduct {
            name: req.name,
            slug: req.slug,
            price: Money::from_paise(req.price_paise),
            stock: req.stock,
            active: req.active,
        })
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(ProductResponse::from(&product)),
    ))
}

/// PUT /products/{id} — replace a product. ADMIN only.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    require_admin(&state.sessions, &headers).await?;

    let product_id = parse_product_id(&id)?;
    let mut product = state
        .store
        .find_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    product.name = req.name;
    product.slug = req.slug;
    product.price = Money::from_paise(req.price_paise);
    product.stock = req.stock;
    product.active = req.active;
    state.store.update_product(product.clone()).await?;

    Ok(Json(ProductResponse::from(&product)))
}

fn parse_product_id(id: &str) -> Result<common::ProductId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid product ID: {e}")))?;
    Ok(common::ProductId::from_uuid(uuid))
}
