//! `/api/categories`

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tracing::info;

use kasir_core::input::CategoryInput;
use kasir_core::{Category, PageQuery, PageRequest};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/all", get(all))
        .route("/api/categories/{id}", get(show).put(update).delete(destroy))
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ApiResponse<Vec<Category>>> {
    let page = PageRequest::from_query(&query)?;
    let categories = state.db.categories().list(&page).await?;
    Ok(ApiResponse::paged("List Data Categories", categories))
}

pub async fn all(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Category>>> {
    let categories = state.db.categories().all().await?;
    Ok(ApiResponse::ok("List Data Categories", categories))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state.db.categories().create(&input).await?;
    info!(category_id = category.id, "Category created");
    Ok(ApiResponse::created("Category created", category))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))?;
    Ok(ApiResponse::ok("Detail Data Category", category))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state.db.categories().update(id, &input).await?;
    Ok(ApiResponse::ok("Category updated", category))
}

pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state.db.categories().delete(id).await?;
    info!(category_id = id, "Category deleted");
    Ok(ApiResponse::message("Category deleted"))
}
