use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod cart;
mod catalog;
pub mod checkout;
mod error;
mod observability;
mod orders;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}

/// Open the store, seed the catalog if needed, and assemble the shared app
/// state. The store handle lives as long as the state.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.database.path,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    store.initialize_catalog(&config).await?;

    Ok(Arc::new(AppState {
        config,
        store,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let static_dir = state.config.server.static_dir.clone();

    let protected = Router::new()
        .route("/profile", get(auth::get_profile))
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_item))
        .route("/cart/remove", post(cart::remove_item))
        .route("/cart/clear", post(cart::clear_cart))
        .route("/checkout", post(checkout::checkout))
        .route("/orders", get(orders::list_orders))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let api_router = Router::new()
        .merge(protected)
        .route("/products", get(catalog::list_products))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .with_state(state)
}
