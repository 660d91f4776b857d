//! `/api/products`, per-category listing and barcode lookup.

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::info;

use kasir_core::input::ProductInput;
use kasir_core::validation::validate_barcode;
use kasir_core::{PageQuery, PageRequest, Product};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BarcodeLookup {
    #[serde(default)]
    pub barcode: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/{id}", get(show).put(update).delete(destroy))
        .route("/api/products-by-category/{id}", get(by_category))
        .route("/api/product-by-barcode", post(by_barcode))
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ApiResponse<Vec<Product>>> {
    let page = PageRequest::from_query(&query)?;
    let products = state.db.products().list(&page).await?;
    Ok(ApiResponse::paged("List Data Products", products))
}

pub async fn by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ApiResponse<Vec<Product>>> {
    let page = PageRequest::from_query(&query)?;
    let products = state
        .db
        .products()
        .list_by_category(category_id, &page)
        .await?;
    Ok(ApiResponse::paged("List Data Products by Category", products))
}

pub async fn by_barcode(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BarcodeLookup>,
) -> ApiResult<ApiResponse<Product>> {
    validate_barcode(&body.barcode)?;

    let product = state
        .db
        .products()
        .get_by_barcode(&body.barcode)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", body.barcode)))?;
    Ok(ApiResponse::ok("Detail Data Product", product))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<ApiResponse<Product>> {
    let product = state.db.products().create(&input).await?;
    info!(product_id = product.id, barcode = %product.barcode, "Product created");
    Ok(ApiResponse::created("Product created", product))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Product>> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;
    Ok(ApiResponse::ok("Detail Data Product", product))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<ApiResponse<Product>> {
    let product = state.db.products().update(id, &input).await?;
    info!(product_id = id, "Product updated");
    Ok(ApiResponse::ok("Product updated", product))
}

pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state.db.products().delete(id).await?;
    info!(product_id = id, "Product deleted");
    Ok(ApiResponse::message("Product deleted"))
}
