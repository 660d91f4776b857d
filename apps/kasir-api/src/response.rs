//! Success envelope.
//!
//! ```json
//! { "meta": { "success": true, "message": "..." },
//!   "data": ...,
//!   "pagination": { "current_page": 1, "total_pages": 3, "per_page": 5, "total": 12 } }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kasir_core::{Page, Pagination};

#[derive(Debug, Serialize)]
pub struct Meta {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// A successful response: status code plus envelope.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse {
            status,
            body: Envelope {
                meta: Meta {
                    success: true,
                    message: message.into(),
                },
                data,
                pagination: None,
            },
        }
    }

    /// 200 with data.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, Some(data))
    }

    /// 201 with data.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, Some(data))
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// 200 with one page of items and the pagination block.
    pub fn paged(message: impl Into<String>, page: Page<T>) -> Self {
        let mut response = Self::new(StatusCode::OK, message, Some(page.items));
        response.body.pagination = Some(page.pagination);
        response
    }
}

impl ApiResponse<()> {
    /// 200 with only a message (deletes).
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
