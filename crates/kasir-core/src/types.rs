//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    Product      │◄──│    CartLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  barcode (uniq) │   │  cashier_id     │──┐    │
//! │  │  name           │   │  buy/sell price │   │  qty, price     │  │    │
//! │  └─────────────────┘   │  stock ≥ 0      │   └─────────────────┘  │    │
//! │                        └────────┬────────┘                        │    │
//! │                                 │ checkout                        ▼    │
//! │  ┌─────────────────┐   ┌────────┴────────┐   ┌─────────────────┐       │
//! │  │    Customer     │◄──│   Transaction   │──►│      User       │       │
//! │  │  no_telp        │   │  invoice (uniq) │   │  (cashier)      │       │
//! │  └─────────────────┘   │  cash, change   │   └─────────────────┘       │
//! │                        └───┬─────────┬───┘                             │
//! │                            ▼         ▼                                  │
//! │               TransactionDetail    Profit                               │
//! │               (frozen cart price)  (live prices)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are SQLite INTEGER primary keys. Transaction, TransactionDetail and
//! Profit rows are append-only history; nothing in the system updates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// User (cashier)
// =============================================================================

/// A back-office user. Every authenticated user acts as a cashier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,

    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Image reference (path or URL); upload handling lives elsewhere.
    pub image: String,
    pub description: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog, joined with its category name.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,

    /// Unique scan code.
    pub barcode: String,
    pub title: String,
    pub description: String,

    /// What the shop paid per unit.
    pub buy_price: Money,

    /// What the customer pays per unit.
    pub sell_price: Money,

    /// Units on hand. Checkout never drives this below zero.
    pub stock: i64,

    pub image: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Margin earned on `qty` units at the current prices:
    /// `qty × sell_price − qty × buy_price`.
    pub fn profit_for(&self, qty: i64) -> CoreResult<Money> {
        let too_large = || ValidationError::TooLarge {
            field: "profit".to_string(),
        };

        let revenue = self.sell_price.multiply_quantity(qty).ok_or_else(too_large)?;
        let cost = self.buy_price.multiply_quantity(qty).ok_or_else(too_large)?;
        Ok(revenue.checked_sub(cost).ok_or_else(too_large)?)
    }

    #[inline]
    pub fn has_stock_for(&self, qty: i64) -> bool {
        self.stock >= qty
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Phone number.
    pub no_telp: String,
    pub address: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cart
// =============================================================================

/// A staged line in a cashier's cart.
///
/// `price` is the snapshot `qty × sell_price` taken when the line was last
/// modified. It is not recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartLine {
    pub id: i64,
    pub cashier_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A cart line with the product and cashier details the UI renders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartItem {
    pub id: i64,
    pub cashier_id: i64,
    pub cashier_name: String,
    pub product_id: i64,
    pub product_title: String,
    pub product_barcode: String,
    pub product_image: String,
    pub sell_price: Money,
    pub qty: i64,
    pub price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Result of listing a cart: the lines plus the sum of their prices.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSummary {
    pub carts: Vec<CartItem>,
    pub total_price: Money,
}

impl CartSummary {
    /// Fails when the line prices do not add up within the money range.
    pub fn new(carts: Vec<CartItem>) -> CoreResult<Self> {
        let total_price = Money::checked_sum(carts.iter().map(|c| c.price)).ok_or_else(|| {
            ValidationError::TooLarge {
                field: "total_price".to_string(),
            }
        })?;
        Ok(Self { carts, total_price })
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed checkout. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    pub cashier_id: i64,
    pub customer_id: Option<i64>,
    /// `INV-<unix millis>-<1..=10000>`, globally unique.
    pub invoice: String,
    pub cash: Money,
    pub change: Money,
    pub discount: Money,
    pub grand_total: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One purchased line. `price` is copied from the cart line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub qty: i64,
    pub price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Margin recorded for one purchased line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Profit {
    pub id: i64,
    pub transaction_id: i64,
    pub total: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A transaction looked up by invoice, with names and lines attached.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionReceipt {
    #[serde(flatten)]
    #[ts(flatten)]
    pub transaction: Transaction,
    pub cashier_name: String,
    pub customer_name: Option<String>,
    pub details: Vec<TransactionDetail>,
}

// =============================================================================
// Unit Tests
// =============================================================================
