//! Dashboard, sales and profit reports.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use kasir_core::report::{Dashboard, DateRange, ProfitReport, SalesReport};

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

/// `?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`, both inclusive.
#[derive(Debug, Deserialize)]
pub struct DateWindow {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateWindow {
    fn range(&self) -> ApiResult<DateRange> {
        Ok(DateRange::from_query(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/sales", get(sales))
        .route("/api/profits", get(profits))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<ApiResponse<Dashboard>> {
    let dashboard = state
        .db
        .reports()
        .dashboard(
            Utc::now().date_naive(),
            state.config.low_stock_threshold,
            state.config.top_products_limit,
        )
        .await?;
    Ok(ApiResponse::ok("Dashboard", dashboard))
}

pub async fn sales(
    State(state): State<AppState>,
    ApiQuery(window): ApiQuery<DateWindow>,
) -> ApiResult<ApiResponse<SalesReport>> {
    let report = state.db.reports().sales(&window.range()?).await?;
    Ok(ApiResponse::ok("Sales Report", report))
}

pub async fn profits(
    State(state): State<AppState>,
    ApiQuery(window): ApiQuery<DateWindow>,
) -> ApiResult<ApiResponse<ProfitReport>> {
    let report = state.db.reports().profits(&window.range()?).await?;
    Ok(ApiResponse::ok("Profit Report", report))
}
