//! HTTP API server with observability for the storefront.
//!
//! Provides the checkout and payment-verification endpoints, order and
//! catalog reads, and the admin back-office surface, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use checkout::{CheckoutCoordinator, RecordingFulfillment};
use gateway::{InMemoryGateway, PaymentGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
use routes::AppState;
use session::InMemorySessions;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, G>(state: Arc<AppState<S, G>>, metrics_handle: PrometheusHandle) -> Router
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout", post(routes::checkout::place::<S, G>))
        .route(
            "/checkout/{id}/retry-payment",
            post(routes::checkout::retry_payment::<S, G>),
        )
        .route("/payment/verify", post(routes::payment::verify::<S, G>))
        .route("/orders", get(routes::orders::list::<S, G>))
        .route("/orders/{id}", get(routes::orders::get::<S, G>))
        .route(
            "/orders/{id}/status",
            post(routes::orders::update_status::<S, G>),
        )
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<S, G>))
        .route("/my/orders", get(routes::orders::mine::<S, G>))
        .route("/products", get(routes::products::list::<S, G>))
        .route("/products", post(routes::products::create::<S, G>))
        .route(
            "/products/slug/{slug}",
            get(routes::products::get_by_slug::<S, G>),
        )
        .route("/products/{id}", get(routes::products::get::<S, G>))
        .route("/products/{id}", put(routes::products::update::<S, G>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state around an explicit gateway implementation.
pub fn create_state<S, G>(store: S, gateway: G, config: &Config) -> Arc<AppState<S, G>>
where
    S: Store + Clone + 'static,
    G: PaymentGateway + 'static,
{
    let checkout = CheckoutCoordinator::new(
        store.clone(),
        gateway,
        RecordingFulfillment::new(),
        Arc::new(domain::NoCharges),
        config.gateway_key_secret.clone(),
        config.currency.clone(),
    );

    Arc::new(AppState {
        checkout,
        store,
        sessions: InMemorySessions::new(),
    })
}

/// Creates the default application state with the in-memory gateway.
pub fn create_default_state<S>(store: S, config: &Config) -> Arc<AppState<S, InMemoryGateway>>
where
    S: Store + Clone + 'static,
{
    create_state(store, InMemoryGateway::new(), config)
}
