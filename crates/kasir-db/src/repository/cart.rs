//! # Cart Repository
//!
//! Per-cashier staging area for a sale.
//!
//! ## Merge Semantics
//! ```text
//!   add(kasir 1, Kopi, 2)  ──► line { qty 2, price 2 × sell }
//!   add(kasir 1, Kopi, 3)  ──► line { qty 5, price 5 × sell (current) }
//!   add(kasir 2, Kopi, 1)  ──► separate line, kasir 1 untouched
//! ```
//!
//! A line's `price` is a snapshot taken on its last modification. Checkout
//! copies it into the transaction detail as-is.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use kasir_core::validation::validate_quantity;
use kasir_core::{
    CartItem, CartLine, CartSummary, CoreError, Money, ValidationError, MAX_ITEM_QUANTITY,
};

const SELECT_ITEM: &str = "SELECT ca.id, ca.cashier_id, u.name AS cashier_name, \
     ca.product_id, p.title AS product_title, p.barcode AS product_barcode, \
     p.image AS product_image, p.sell_price, ca.qty, ca.price, ca.created_at \
     FROM carts ca \
     JOIN users u ON u.id = ca.cashier_id \
     JOIN products p ON p.id = ca.product_id";

fn too_large(field: &str) -> CoreError {
    ValidationError::TooLarge {
        field: field.to_string(),
    }
    .into()
}

#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Adds `qty` of a product to the cashier's cart, merging with an
    /// existing line for the same product.
    ///
    /// ## Returns
    /// * `Err(Domain(ProductNotFound))` - no such product
    /// * `Err(Domain(QuantityTooLarge))` - merged quantity above the limit
    /// * `Err(Domain(Validation(TooLarge)))` - the line price or the cart
    ///   total would leave the money range; the cart is unchanged
    pub async fn add(&self, cashier_id: i64, product_id: i64, qty: i64) -> DbResult<CartItem> {
        validate_quantity(qty)?;
        debug!(cashier_id, product_id, qty, "Adding to cart");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(CoreError::ProductNotFound(product_id.to_string()).into());
        }

        // The upsert's WHERE leaves an over-limit merge untouched, in which
        // case RETURNING yields nothing. An overflowing price turns REAL and
        // trips the column's CHECK.
        let line_id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO carts (cashier_id, product_id, qty, price, created_at, updated_at)
            SELECT ?1, p.id, ?3, ?3 * p.sell_price, ?4, ?4
            FROM products p WHERE p.id = ?2
            ON CONFLICT (cashier_id, product_id) DO UPDATE SET
                qty = carts.qty + excluded.qty,
                price = (carts.qty + excluded.qty)
                    * (SELECT sell_price FROM products WHERE id = excluded.product_id),
                updated_at = excluded.updated_at
            WHERE carts.qty + excluded.qty <= ?5
            RETURNING id
            "#,
        )
        .bind(cashier_id)
        .bind(product_id)
        .bind(qty)
        .bind(Utc::now())
        .bind(MAX_ITEM_QUANTITY)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::ForeignKeyViolation { .. } => DbError::not_found("User", cashier_id),
            DbError::CheckViolation { .. } => too_large("price").into(),
            other => other,
        })?;

        let line_id = match line_id {
            Some(id) => id,
            None => {
                let current: i64 = sqlx::query_scalar(
                    "SELECT COALESCE(SUM(qty), 0) FROM carts WHERE cashier_id = ?1 AND product_id = ?2",
                )
                .bind(cashier_id)
                .bind(product_id)
                .fetch_one(&mut *tx)
                .await?;

                return Err(CoreError::QuantityTooLarge {
                    requested: current + qty,
                    max: MAX_ITEM_QUANTITY,
                }
                .into());
            }
        };

        // Keep the cart total representable so the cart stays listable.
        let prices: Vec<Money> = sqlx::query_scalar("SELECT price FROM carts WHERE cashier_id = ?1")
            .bind(cashier_id)
            .fetch_all(&mut *tx)
            .await?;
        if Money::checked_sum(prices).is_none() {
            warn!(cashier_id, product_id, "Cart total out of range");
            return Err(too_large("total_price").into());
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(cashier_id, product_id, line_id, "Cart line saved");

        sqlx::query_as::<_, CartItem>(&format!("{SELECT_ITEM} WHERE ca.id = ?1"))
            .bind(line_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("CartLine", line_id))
    }

    /// The cashier's cart, newest line first, with its total.
    pub async fn list(&self, cashier_id: i64) -> DbResult<CartSummary> {
        debug!(cashier_id, "Listing cart");

        let items = sqlx::query_as::<_, CartItem>(&format!(
            "{SELECT_ITEM} WHERE ca.cashier_id = ?1 ORDER BY ca.id DESC"
        ))
        .bind(cashier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CartSummary::new(items)?)
    }

    /// Raw cart rows of a cashier, oldest first.
    pub async fn lines(&self, cashier_id: i64) -> DbResult<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT id, cashier_id, product_id, qty, price, created_at, updated_at \
             FROM carts WHERE cashier_id = ?1 ORDER BY id ASC",
        )
        .bind(cashier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Removes one line of the cashier's own cart.
    ///
    /// A line owned by someone else is reported exactly like a missing one.
    pub async fn remove(&self, cashier_id: i64, line_id: i64) -> DbResult<()> {
        debug!(cashier_id, line_id, "Removing cart line");

        let result = sqlx::query("DELETE FROM carts WHERE id = ?1 AND cashier_id = ?2")
            .bind(line_id)
            .bind(cashier_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CartLineNotFound(line_id).into());
        }

        Ok(())
    }
}
