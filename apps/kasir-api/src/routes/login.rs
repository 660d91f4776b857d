//! `POST /api/login`

use axum::extract::State;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use kasir_core::password::verify_password;
use kasir_core::validation::validate_required;
use kasir_core::User;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::routes::blocking;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/login", post(login))
}

/// Unknown email is 404, wrong password 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    validate_required("email", &body.email, 255)?;
    validate_required("password", &body.password, 255)?;

    let user = state
        .db
        .users()
        .get_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Email is not registered".to_string()))?;

    let hash = user.password.clone();
    let password = body.password;
    if !blocking(move || verify_password(&password, &hash)).await? {
        return Err(ApiError::AuthFailed("Incorrect password".to_string()));
    }

    let token = state.jwt.generate_token(user.id, &user.name)?;
    info!(user_id = user.id, "Login succeeded");

    Ok(ApiResponse::ok("Login success", LoginResponse { user, token }))
}
