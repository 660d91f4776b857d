//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! Everything the back-office decides without touching storage: money,
//! domain types, input rules, the checkout plan, invoice numbers, pagination
//! math and report shapes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Admin frontend (browser)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kasir-api (axum routes)                        │   │
//! │  │    /login, /products, /carts, /transactions, /dashboard …      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   plan    │  │   rules   │  │   │
//! │  │   │ CartLine  │  │  decimal  │  │  profit   │  │  password │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, checkout transaction         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`checkout`] - Checkout input parsing and write planning
//! - [`invoice`] - Invoice number composition
//! - [`input`] - Create/update payloads with validation
//! - [`validation`] - Field-level rules
//! - [`pagination`] - Page requests and pagination blocks
//! - [`report`] - Sales/profit/dashboard shapes and date windows
//! - [`password`] - Argon2 hashing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::Money;
//!
//! let sell: Money = "10000".parse().unwrap();
//! let buy: Money = "8000".parse().unwrap();
//!
//! // Profit on two units
//! let revenue = sell.multiply_quantity(2).unwrap();
//! let cost = buy.multiply_quantity(2).unwrap();
//! assert_eq!(revenue.checked_sub(cost), Some(Money::from_major(4000)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod input;
pub mod invoice;
pub mod money;
pub mod pagination;
pub mod password;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{CheckoutInput, CheckoutPlan, CheckoutRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pagination::{Page, PageQuery, PageRequest, Pagination};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on one cart line.
///
/// ## Business Reason
/// Catches fat-finger entries (1000 instead of 10) at the till.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price the catalog accepts.
///
/// A full cart line (`MAX_ITEM_QUANTITY` units) at this price stays far
/// inside the i64 range of minor units.
pub const MAX_PRICE: Money = Money::from_major(1_000_000_000_000);

/// Highest stock level the catalog accepts.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Default threshold for the dashboard's low-stock list.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Default size of the dashboard's best-seller list.
pub const DEFAULT_TOP_PRODUCTS: i64 = 5;
