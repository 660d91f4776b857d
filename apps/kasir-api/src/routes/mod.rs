//! HTTP routes.
//!
//! Each module exposes `router()`; [`build_router`] merges them behind the
//! auth middleware and the CORS / trace layers.

pub mod carts;
pub mod categories;
pub mod customers;
pub mod health;
pub mod login;
pub mod products;
pub mod reports;
pub mod transactions;
pub mod users;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

/// Create the combined router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(login::router())
        .merge(users::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(customers::router())
        .merge(carts::router())
        .merge(transactions::router())
        .merge(reports::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Spawns CPU-bound password work off the async workers.
pub(crate) async fn blocking<T, F>(work: F) -> crate::error::ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| crate::error::ApiError::Internal(format!("Worker failed: {}", e)))
}
