//! `/api/users`: cashier accounts.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tracing::info;

use kasir_core::input::{NewUser, UpdateUser};
use kasir_core::password::hash_password;
use kasir_core::{PageQuery, PageRequest, User};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::ApiResponse;
use crate::routes::blocking;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(create))
        .route("/api/users/{id}", get(show).put(update).delete(destroy))
}

async fn hash(password: String) -> ApiResult<String> {
    blocking(move || hash_password(&password))
        .await?
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ApiResponse<Vec<User>>> {
    let page = PageRequest::from_query(&query)?;
    let users = state.db.users().list(&page).await?;
    Ok(ApiResponse::paged("List Data Users", users))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewUser>,
) -> ApiResult<ApiResponse<User>> {
    input.validate()?;
    let password_hash = hash(input.password.clone()).await?;

    let user = state.db.users().create(&input, &password_hash).await?;
    info!(user_id = user.id, "User created");
    Ok(ApiResponse::created("User created", user))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<User>> {
    let user = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", id)))?;
    Ok(ApiResponse::ok("Detail Data User", user))
}

/// An empty or missing password keeps the current one.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateUser>,
) -> ApiResult<ApiResponse<User>> {
    input.validate()?;
    let password_hash = match input.new_password() {
        Some(password) => Some(hash(password.to_string()).await?),
        None => None,
    };

    let user = state
        .db
        .users()
        .update(id, &input, password_hash.as_deref())
        .await?;
    info!(user_id = id, "User updated");
    Ok(ApiResponse::ok("User updated", user))
}

pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state.db.users().delete(id).await?;
    info!(user_id = id, "User deleted");
    Ok(ApiResponse::message("User deleted"))
}
