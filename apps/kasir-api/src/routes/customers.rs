//! `/api/customers`

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use kasir_core::input::CustomerInput;
use kasir_core::{Customer, PageQuery, PageRequest};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list).post(create))
        .route("/api/customers/all", get(all))
        .route("/api/customers/{id}", get(show).put(update).delete(destroy))
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ApiResponse<Vec<Customer>>> {
    let page = PageRequest::from_query(&query)?;
    let customers = state.db.customers().list(&page).await?;
    Ok(ApiResponse::paged("List Data Customers", customers))
}

pub async fn all(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Customer>>> {
    let customers = state.db.customers().all().await?;
    Ok(ApiResponse::ok("List Data Customers", customers))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<ApiResponse<Customer>> {
    let customer = state.db.customers().create(&input).await?;
    Ok(ApiResponse::created("Customer created", customer))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Customer>> {
    let customer = state
        .db
        .customers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer not found: {}", id)))?;
    Ok(ApiResponse::ok("Detail Data Customer", customer))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<ApiResponse<Customer>> {
    let customer = state.db.customers().update(id, &input).await?;
    Ok(ApiResponse::ok("Customer updated", customer))
}

pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state.db.customers().delete(id).await?;
    Ok(ApiResponse::message("Customer deleted"))
}
