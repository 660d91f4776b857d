//! `/api/transactions`: checkout and invoice lookup.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use kasir_core::invoice::looks_like_invoice;
use kasir_core::{CheckoutInput, CheckoutRequest, CoreError, Transaction, TransactionReceipt};

use crate::auth::CurrentCashier;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    pub invoice: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/transactions", get(show).post(checkout))
}

/// Turns the caller's cart into a transaction.
pub async fn checkout(
    State(state): State<AppState>,
    cashier: CurrentCashier,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> ApiResult<ApiResponse<Transaction>> {
    let input = CheckoutInput::parse(&body)?;
    let transaction = state.db.transactions().checkout(cashier.id, &input).await?;
    Ok(ApiResponse::created("Transaction created", transaction))
}

pub async fn show(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<InvoiceQuery>,
) -> ApiResult<ApiResponse<TransactionReceipt>> {
    let invoice = query
        .invoice
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("invoice is required".to_string()))?;

    if !looks_like_invoice(invoice.trim()) {
        return Err(CoreError::TransactionNotFound(invoice).into());
    }

    let receipt = state.db.transactions().get_by_invoice(&invoice).await?;
    Ok(ApiResponse::ok("Detail Data Transaction", receipt))
}
