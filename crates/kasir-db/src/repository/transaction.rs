//! # Transaction Repository
//!
//! Checkout and invoice lookup.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          checkout(cashier)                              │
//! │                                                                         │
//! │  lock(cashier) ── serializes double submits                            │
//! │       │                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │  DELETE FROM carts WHERE cashier_id = ? RETURNING *   ← write lock     │
//! │       │ (none) ──► EmptyCart, ROLLBACK                                 │
//! │       ▼                                                                 │
//! │  read products ──► plan_checkout() ──► InsufficientStock, ROLLBACK     │
//! │       │                                                                 │
//! │  INSERT transactions (fresh invoice on collision, 5 attempts)          │
//! │  INSERT transaction_details  (frozen cart price)                       │
//! │  INSERT profits              (live product prices)                     │
//! │  UPDATE products SET stock = stock - n WHERE stock >= n                │
//! │       │                                                                 │
//! │  COMMIT ── all or nothing; the deleted cart comes back on rollback     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::locks::CheckoutLocks;
use crate::repository::product::SELECT_PRODUCT;
use kasir_core::checkout::plan_checkout;
use kasir_core::invoice::{compose_invoice, INVOICE_NONCE_MAX};
use kasir_core::{
    CartLine, CheckoutInput, CoreError, Product, Transaction, TransactionDetail,
    TransactionReceipt,
};

/// How many invoices checkout tries before giving up on collisions.
pub const INVOICE_ATTEMPTS: usize = 5;

const TRANSACTION_COLUMNS: &str =
    "id, cashier_id, customer_id, invoice, cash, change, discount, grand_total, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    locks: Arc<CheckoutLocks>,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool, locks: Arc<CheckoutLocks>) -> Self {
        TransactionRepository { pool, locks }
    }

    /// Turns the cashier's cart into a transaction.
    ///
    /// ## Returns
    /// * `Ok(transaction)` - committed; cart emptied, stock decremented
    /// * `Err(Domain(EmptyCart))` - nothing to check out
    /// * `Err(Domain(InsufficientStock))` - cart left intact
    /// * `Err(NotFound)` - `customer_id` doesn't exist
    pub async fn checkout(&self, cashier_id: i64, input: &CheckoutInput) -> DbResult<Transaction> {
        let _guard = self.locks.acquire(cashier_id).await;
        debug!(cashier_id, "Checkout started");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut lines = sqlx::query_as::<_, CartLine>(
            "DELETE FROM carts WHERE cashier_id = ?1 \
             RETURNING id, cashier_id, product_id, qty, price, created_at, updated_at",
        )
        .bind(cashier_id)
        .fetch_all(&mut *tx)
        .await?;
        lines.sort_by_key(|l| l.id);

        let products = load_products(&mut tx, &lines).await?;
        let plan = plan_checkout(cashier_id, &lines, &products)?;

        let now = Utc::now();
        let transaction =
            insert_transaction(&mut tx, cashier_id, input, now, next_invoice).await?;

        for line in &plan.lines {
            sqlx::query(
                "INSERT INTO transaction_details (transaction_id, product_id, qty, price, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            )
            .bind(transaction.id)
            .bind(line.product_id)
            .bind(line.qty)
            .bind(line.price)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO profits (transaction_id, total, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?3)",
            )
            .bind(transaction.id)
            .bind(line.profit)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        for decrement in &plan.decrements {
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ?2, updated_at = ?3 \
                 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(decrement.product_id)
            .bind(decrement.qty)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: i64 = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(decrement.product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .unwrap_or(0);

                warn!(product_id = decrement.product_id, available, "Stock changed during checkout");
                return Err(CoreError::InsufficientStock {
                    product_id: decrement.product_id,
                    title: decrement.title.clone(),
                    available,
                    requested: decrement.qty,
                }
                .into());
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            cashier_id,
            invoice = %transaction.invoice,
            lines = plan.lines.len(),
            grand_total = %transaction.grand_total,
            "Checkout completed"
        );

        Ok(transaction)
    }

    /// Gets a transaction by invoice with names and purchased lines.
    pub async fn get_by_invoice(&self, invoice: &str) -> DbResult<TransactionReceipt> {
        debug!(invoice = %invoice, "Getting transaction by invoice");

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE invoice = ?1"
        ))
        .bind(invoice.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::TransactionNotFound(invoice.trim().to_string()))?;

        let cashier_name: String = sqlx::query_scalar("SELECT name FROM users WHERE id = ?1")
            .bind(transaction.cashier_id)
            .fetch_one(&self.pool)
            .await?;

        let customer_name: Option<String> = match transaction.customer_id {
            Some(id) => sqlx::query_scalar("SELECT name FROM customers WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
            None => None,
        };

        let details = sqlx::query_as::<_, TransactionDetail>(
            "SELECT d.id, d.transaction_id, d.product_id, p.title AS product_title, \
             d.qty, d.price, d.created_at \
             FROM transaction_details d JOIN products p ON p.id = d.product_id \
             WHERE d.transaction_id = ?1 ORDER BY d.id ASC",
        )
        .bind(transaction.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(TransactionReceipt {
            transaction,
            cashier_name,
            customer_name,
            details,
        })
    }
}

fn next_invoice() -> String {
    let nonce = rand::thread_rng().gen_range(1..=INVOICE_NONCE_MAX);
    compose_invoice(Utc::now().timestamp_millis(), nonce)
}

/// Products referenced by `lines`, read through the checkout connection.
async fn load_products(
    conn: &mut SqliteConnection,
    lines: &[CartLine],
) -> DbResult<HashMap<i64, Product>> {
    let ids: BTreeSet<i64> = lines.iter().map(|l| l.product_id).collect();
    let mut products = HashMap::with_capacity(ids.len());

    for id in ids {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(product) = product {
            products.insert(id, product);
        }
    }

    Ok(products)
}

/// Inserts the transaction row, drawing a new invoice from `next_invoice`
/// whenever the previous one collides.
async fn insert_transaction(
    conn: &mut SqliteConnection,
    cashier_id: i64,
    input: &CheckoutInput,
    now: DateTime<Utc>,
    mut next_invoice: impl FnMut() -> String,
) -> DbResult<Transaction> {
    let mut invoice = String::new();

    for attempt in 1..=INVOICE_ATTEMPTS {
        invoice = next_invoice();

        let result = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions \
             (cashier_id, customer_id, invoice, cash, change, discount, grand_total, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(cashier_id)
        .bind(input.customer_id)
        .bind(&invoice)
        .bind(input.cash)
        .bind(input.change)
        .bind(input.discount)
        .bind(input.grand_total)
        .bind(now)
        .fetch_one(&mut *conn)
        .await;

        match result.map_err(DbError::from) {
            Ok(transaction) => return Ok(transaction),
            Err(DbError::UniqueViolation { field, .. }) if field == "invoice" => {
                warn!(attempt, invoice = %invoice, "Invoice collision");
            }
            Err(DbError::ForeignKeyViolation { .. }) => {
                return Err(match input.customer_id {
                    Some(id) => DbError::not_found("Customer", id),
                    None => DbError::not_found("User", cashier_id),
                });
            }
            Err(other) => return Err(other),
        }
    }

    Err(DbError::TransactionFailed(format!(
        "invoice still taken after {} attempts: {}",
        INVOICE_ATTEMPTS, invoice
    )))
}

// =============================================================================
// Unit Tests
// =============================================================================
