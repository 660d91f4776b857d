//! JWT authentication module.
//!
//! Handles token generation and validation, the middleware guarding `/api`
//! routes, and the [`CurrentCashier`] extractor.
//!
//! ```text
//!   POST /api/login ──► JwtManager::generate_token ──► { user, token }
//!
//!   GET /api/carts
//!     Authorization: Bearer <token>   (or just <token>)
//!        │
//!        ▼
//!   require_auth ── validate ──► CurrentCashier in request extensions
//!        │                              │
//!        ▼                              ▼
//!   handler(CurrentCashier) ◄──── extractor reads the extension
//! ```

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts, Method};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Routes under `/api` reachable without a token.
const PUBLIC_API_ROUTES: &[&str] = &["/api/login"];

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name of the cashier
    pub name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Generate a token for a user.
    pub fn generate_token(&self, user_id: i64, name: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::InvalidToken(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract the token from an authorization header.
///
/// Accepts both `Bearer <token>` and a bare `<token>`.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .unwrap_or(auth_header)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// The authenticated user, acting as cashier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCashier {
    pub id: i64,
    pub name: String,
}

impl TryFrom<Claims> for CurrentCashier {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| ApiError::InvalidToken("Invalid token subject".to_string()))?;

        Ok(CurrentCashier {
            id,
            name: claims.name,
        })
    }
}

fn authenticate(jwt: &JwtManager, auth_header: Option<&str>) -> Result<CurrentCashier, ApiError> {
    let header =
        auth_header.ok_or_else(|| ApiError::AuthFailed("Missing authorization token".to_string()))?;
    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::InvalidToken("Invalid authorization header".to_string()))?;

    CurrentCashier::try_from(jwt.validate_token(token)?)
}

/// Guards every `/api` route except [`PUBLIC_API_ROUTES`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path();

    // CORS preflight
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes (health, 404s) pass through
    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let cashier = match authenticate(&state.jwt, auth_header) {
        Ok(cashier) => cashier,
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "Authentication failed");
            return Err(e);
        }
    };

    tracing::debug!(cashier_id = cashier.id, "Authenticated");
    req.extensions_mut().insert(cashier);

    Ok(next.run(req).await)
}

impl FromRequestParts<AppState> for CurrentCashier {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already validated by the middleware
        if let Some(cashier) = parts.extensions.get::<CurrentCashier>() {
            return Ok(cashier.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let cashier = authenticate(&state.jwt, auth_header)?;
        parts.extensions.insert(cashier.clone());
        Ok(cashier)
    }
}
