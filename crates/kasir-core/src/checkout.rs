//! # Checkout Planning
//!
//! Pure half of the checkout workflow. kasir-db reads the cart and the
//! products inside a database transaction, hands them to [`plan_checkout`],
//! then writes exactly what the plan says.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutRequest (raw JSON values)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutInput::parse      numbers or numeric strings → Money           │
//! │       │                    InvalidInput { field } on failure            │
//! │       ▼                                                                 │
//! │  plan_checkout(cart lines, products)                                    │
//! │       │                                                                 │
//! │       ├── no lines?                → EmptyCart                          │
//! │       ├── Σqty per product > stock → InsufficientStock                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutPlan                                                           │
//! │   ├── lines:      detail price = cart snapshot                          │
//! │   │               profit = qty×sell − qty×buy at current prices         │
//! │   └── decrements: one per product, quantities summed                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, Product};

// =============================================================================
// Input
// =============================================================================

/// Checkout body as it arrives over the wire.
///
/// Fields stay as raw JSON so each one can be reported by name when it
/// fails to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub customer_id: Value,
    #[serde(default)]
    #[ts(type = "number | string")]
    pub cash: Value,
    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub discount: Value,
    #[serde(default)]
    #[ts(type = "number | string")]
    pub change: Value,
    #[serde(default)]
    #[ts(type = "number | string")]
    pub grand_total: Value,
}

/// Validated checkout amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutInput {
    pub customer_id: Option<i64>,
    pub cash: Money,
    pub discount: Money,
    pub change: Money,
    pub grand_total: Money,
}

impl CheckoutInput {
    /// Parses every field. `customer_id` defaults to none and `discount`
    /// to zero; the other amounts are required.
    pub fn parse(raw: &CheckoutRequest) -> CoreResult<Self> {
        Ok(Self {
            customer_id: parse_customer_id(&raw.customer_id)?,
            cash: parse_amount("cash", &raw.cash)?,
            discount: match raw.discount {
                Value::Null => Money::zero(),
                ref v => parse_amount("discount", v)?,
            },
            change: parse_amount("change", &raw.change)?,
            grand_total: parse_amount("grand_total", &raw.grand_total)?,
        })
    }
}

fn parse_amount(field: &str, value: &Value) -> CoreResult<Money> {
    let text = match value {
        Value::Null => return Err(CoreError::invalid_input(field, "is required")),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return Err(CoreError::invalid_input(field, "must be a number")),
    };

    let amount = Money::parse_decimal(&text)
        .map_err(|e| CoreError::invalid_input(field, e.to_string()))?;

    if amount.is_negative() {
        return Err(CoreError::invalid_input(field, "must not be negative"));
    }

    Ok(amount)
}

fn parse_customer_id(value: &Value) -> CoreResult<Option<i64>> {
    let invalid = || CoreError::invalid_input("customer_id", "must be an integer id");

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(invalid),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Plan
// =============================================================================

/// What checkout writes for one consumed cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    pub cart_line_id: i64,
    pub product_id: i64,
    pub qty: i64,
    /// Frozen price from the cart line.
    pub price: Money,
    /// Margin at current product prices.
    pub profit: Money,
}

/// Stock to remove from one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: i64,
    pub title: String,
    pub qty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub lines: Vec<PlannedLine>,
    /// Ordered by product id.
    pub decrements: Vec<StockDecrement>,
}

impl CheckoutPlan {
    /// `None` if the line profits overflow.
    pub fn total_profit(&self) -> Option<Money> {
        Money::checked_sum(self.lines.iter().map(|l| l.profit))
    }
}

/// Builds the write plan for a cashier's cart.
///
/// `products` must contain every product referenced by `lines`, read in
/// the same database transaction.
pub fn plan_checkout(
    cashier_id: i64,
    lines: &[CartLine],
    products: &HashMap<i64, Product>,
) -> CoreResult<CheckoutPlan> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart { cashier_id });
    }

    let mut planned = Vec::with_capacity(lines.len());
    let mut per_product: BTreeMap<i64, (&Product, i64)> = BTreeMap::new();

    for line in lines {
        let product = products
            .get(&line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.to_string()))?;

        planned.push(PlannedLine {
            cart_line_id: line.id,
            product_id: line.product_id,
            qty: line.qty,
            price: line.price,
            profit: product.profit_for(line.qty)?,
        });

        per_product.entry(line.product_id).or_insert((product, 0)).1 += line.qty;
    }

    let mut decrements = Vec::with_capacity(per_product.len());
    for (product_id, (product, qty)) in per_product {
        if !product.has_stock_for(qty) {
            return Err(CoreError::InsufficientStock {
                product_id,
                title: product.title.clone(),
                available: product.stock,
                requested: qty,
            });
        }

        decrements.push(StockDecrement {
            product_id,
            title: product.title.clone(),
            qty,
        });
    }

    Ok(CheckoutPlan {
        lines: planned,
        decrements,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
