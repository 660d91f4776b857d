//! `/api/carts`: the caller's own cart.
//!
//! The cashier always comes from the token; a request can never name
//! another cashier's cart.

use axum::extract::State;
use axum::routing::{delete, get};
use axum::Router;
use serde::Deserialize;

use kasir_core::{CartItem, CartSummary};

use crate::auth::CurrentCashier;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: i64,
    pub qty: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/carts", get(list).post(add))
        .route("/api/carts/{id}", delete(remove))
}

pub async fn list(
    State(state): State<AppState>,
    cashier: CurrentCashier,
) -> ApiResult<ApiResponse<CartSummary>> {
    let summary = state.db.carts().list(cashier.id).await?;
    Ok(ApiResponse::ok("List Data Cart", summary))
}

pub async fn add(
    State(state): State<AppState>,
    cashier: CurrentCashier,
    ApiJson(body): ApiJson<AddToCart>,
) -> ApiResult<ApiResponse<CartItem>> {
    let item = state
        .db
        .carts()
        .add(cashier.id, body.product_id, body.qty)
        .await?;
    Ok(ApiResponse::created("Added to cart", item))
}

pub async fn remove(
    State(state): State<AppState>,
    cashier: CurrentCashier,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state.db.carts().remove(cashier.id, id).await?;
    Ok(ApiResponse::message("Cart line removed"))
}
