//! # Kasir API
//!
//! JSON-over-HTTP back-office for a single shop: login, master data,
//! per-cashier carts, checkout and reports.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasir API Server                               │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Master data   │  │  Cart          │  │  Reports                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • users        │  │ • add / list   │  │ • dashboard                ││
//! │  │ • categories   │  │ • remove line  │  │ • sales                    ││
//! │  │ • products     │  │ • checkout     │  │ • profits                  ││
//! │  │ • customers    │  │ • invoice      │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │   SQLite     │  │  Checkout    │  │    JWT Auth              ││  │
//! │  │  │  (kasir-db)  │  │  locks       │  │  (require_auth)          ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! `kasir.toml` (optional) overridden by environment variables:
//! - `KASIR_HTTP_PORT` - listen port (default: 8000)
//! - `KASIR_DATABASE_PATH` - SQLite file (default: kasir.db)
//! - `KASIR_JWT_SECRET` - HMAC secret, at least 16 bytes
//! - `KASIR_JWT_LIFETIME_SECS` - token lifetime (default: 3600)
//! - `KASIR_LOW_STOCK_THRESHOLD` - dashboard low-stock cut-off (default: 10)
//! - `KASIR_TOP_PRODUCTS_LIMIT` - dashboard best-seller count (default: 5)
//! - `KASIR_MAX_CONNECTIONS` - pool size (default: 5)
//! - `KASIR_LOG_LEVEL` - used when `RUST_LOG` is unset (default: info)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
