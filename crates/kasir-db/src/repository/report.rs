//! # Report Repository
//!
//! Read-only aggregates over the sales history.
//!
//! Windows are half-open `[start, end)` in UTC. Stored timestamps are
//! RFC 3339 text, so range filters are plain string comparisons and
//! `substr(created_at, 1, 10)` is the calendar day.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use kasir_core::report::{
    DailySeries, DailyTotal, Dashboard, DateRange, ProfitRecord, ProfitReport, SaleRecord,
    SalesReport, TopProduct, DASHBOARD_DAYS,
};
use kasir_core::Money;

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Transactions in `range`, newest first, with Σ grand_total.
    pub async fn sales(&self, range: &DateRange) -> DbResult<SalesReport> {
        debug!(start = %range.start, end = %range.end, "Sales report");

        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT t.id, t.invoice, t.cashier_id, u.name AS cashier_name,
                   t.customer_id, c.name AS customer_name,
                   t.cash, t.change, t.discount, t.grand_total, t.created_at
            FROM transactions t
            JOIN users u ON u.id = t.cashier_id
            LEFT JOIN customers c ON c.id = t.customer_id
            WHERE t.created_at >= ?1 AND t.created_at < ?2
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        let total = sales.iter().map(|s| s.grand_total).sum();
        Ok(SalesReport { sales, total })
    }

    /// Profit rows in `range` with their invoice, and Σ total.
    pub async fn profits(&self, range: &DateRange) -> DbResult<ProfitReport> {
        debug!(start = %range.start, end = %range.end, "Profit report");

        let profits = sqlx::query_as::<_, ProfitRecord>(
            r#"
            SELECT pr.id, pr.transaction_id, t.invoice, pr.total, pr.created_at
            FROM profits pr
            JOIN transactions t ON t.id = pr.transaction_id
            WHERE pr.created_at >= ?1 AND pr.created_at < ?2
            ORDER BY pr.created_at DESC, pr.id DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        let total = profits.iter().map(|p| p.total).sum();
        Ok(ProfitReport { profits, total })
    }

    /// Dashboard aggregates as of `today`.
    ///
    /// ## Arguments
    /// * `low_stock_threshold` - products with `stock <= threshold` are listed
    /// * `top_n` - how many best sellers to return
    pub async fn dashboard(
        &self,
        today: NaiveDate,
        low_stock_threshold: i64,
        top_n: i64,
    ) -> DbResult<Dashboard> {
        debug!(%today, low_stock_threshold, top_n, "Building dashboard");

        let week = DateRange::last_days(today, DASHBOARD_DAYS);
        let sales_rows = self.daily("transactions", "grand_total", &week).await?;
        let profit_rows = self.daily("profits", "total", &week).await?;

        let day = DateRange::day(today);
        let (transactions_today, revenue_today): (i64, Money) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(grand_total), 0) FROM transactions \
             WHERE created_at >= ?1 AND created_at < ?2",
        )
        .bind(day.start)
        .bind(day.end)
        .fetch_one(&self.pool)
        .await?;

        let profit_today: Money = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM profits WHERE created_at >= ?1 AND created_at < ?2",
        )
        .bind(day.start)
        .bind(day.end)
        .fetch_one(&self.pool)
        .await?;

        let low_stock_products = ProductRepository::new(self.pool.clone())
            .low_stock(low_stock_threshold)
            .await?;

        let top_products = self.top_products(top_n).await?;

        Ok(Dashboard {
            sales_this_week: DailySeries::fill(&week, &sales_rows),
            profits_this_week: DailySeries::fill(&week, &profit_rows),
            transactions_today,
            revenue_today,
            profit_today,
            low_stock_products,
            top_products,
        })
    }

    /// Best sellers by cumulative quantity sold.
    pub async fn top_products(&self, limit: i64) -> DbResult<Vec<TopProduct>> {
        let top = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT d.product_id, p.title, SUM(d.qty) AS total_qty
            FROM transaction_details d
            JOIN products p ON p.id = d.product_id
            GROUP BY d.product_id, p.title
            ORDER BY total_qty DESC, d.product_id ASC
            LIMIT ?1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(top)
    }

    /// Per-day sums of `column` in `table`. Both names are fixed by callers.
    async fn daily(
        &self,
        table: &'static str,
        column: &'static str,
        range: &DateRange,
    ) -> DbResult<Vec<DailyTotal>> {
        let rows = sqlx::query_as::<_, DailyTotal>(&format!(
            "SELECT substr(created_at, 1, 10) AS date, COALESCE(SUM({column}), 0) AS total \
             FROM {table} WHERE created_at >= ?1 AND created_at < ?2 \
             GROUP BY substr(created_at, 1, 10)"
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::test_support::{cashier, category, product, test_db};
    use chrono::{DateTime, Duration, NaiveTime, Utc};
    use kasir_core::{CheckoutInput, Product, Transaction, User};

    async fn sell(db: &Database, user: &User, product: &Product, qty: i64) -> Transaction {
        db.carts().add(user.id, product.id, qty).await.unwrap();
        let total = product.sell_price.multiply_quantity(qty).unwrap();
        db.transactions()
            .checkout(
                user.id,
                &CheckoutInput {
                    customer_id: None,
                    cash: total,
                    discount: Money::zero(),
                    change: Money::zero(),
                    grand_total: total,
                },
            )
            .await
            .unwrap()
    }

    /// Moves a transaction and its profits to `at`.
    async fn backdate(db: &Database, trx: &Transaction, at: DateTime<Utc>) {
        for table in ["transactions", "profits"] {
            let key = if table == "transactions" { "id" } else { "transaction_id" };
            sqlx::query(&format!("UPDATE {table} SET created_at = ?1 WHERE {key} = ?2"))
                .bind(at)
                .bind(trx.id)
                .execute(db.pool())
                .await
                .unwrap();
        }
    }

    fn at(date: &str, time: NaiveTime) -> DateTime<Utc> {
        date.parse::<NaiveDate>().unwrap().and_time(time).and_utc()
    }

    #[tokio::test]
    async fn test_sales_window_is_inclusive_of_end_day() {
        let db = test_db().await;
        let user = cashier(&db, "a@toko.id").await;
        let cat = category(&db, "Minuman").await;
        let kopi = product(&db, cat.id, "K1", 8, 10, 100).await;

        let first = sell(&db, &user, &kopi, 1).await;
        let late = sell(&db, &user, &kopi, 2).await;
        let next_day = sell(&db, &user, &kopi, 3).await;

        backdate(&db, &first, at("2024-03-01", NaiveTime::MIN)).await;
        let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        backdate(&db, &late, at("2024-03-02", last_ms)).await;
        backdate(&db, &next_day, at("2024-03-03", NaiveTime::MIN)).await;

        let range = DateRange::from_query(Some("2024-03-01"), Some("2024-03-02")).unwrap();
        let report = db.reports().sales(&range).await.unwrap();

        let invoices: Vec<&str> = report.sales.iter().map(|s| s.invoice.as_str()).collect();
        assert_eq!(invoices, [late.invoice.as_str(), first.invoice.as_str()]);
        assert_eq!(report.total, Money::from_major(30));
        assert_eq!(report.sales[0].cashier_name, user.name);
        assert!(report.sales[0].customer_name.is_none());

        let profits = db.reports().profits(&range).await.unwrap();
        assert_eq!(profits.profits.len(), 2);
        assert_eq!(profits.total, Money::from_major(6));
        assert_eq!(profits.profits[0].invoice, late.invoice);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let db = test_db().await;
        let user = cashier(&db, "a@toko.id").await;
        let cat = category(&db, "Minuman").await;
        let kopi = product(&db, cat.id, "K1", 8, 10, 100).await;
        let teh = product(&db, cat.id, "T1", 3, 5, 12).await;

        let today = Utc::now().date_naive();
        let old = sell(&db, &user, &kopi, 1).await;
        backdate(&db, &old, at(&(today - Duration::days(2)).to_string(), NaiveTime::MIN)).await;
        sell(&db, &user, &kopi, 2).await;
        sell(&db, &user, &teh, 3).await;

        let dashboard = db.reports().dashboard(today, 10, 5).await.unwrap();

        assert_eq!(dashboard.transactions_today, 2);
        assert_eq!(dashboard.revenue_today, Money::from_major(35));
        assert_eq!(dashboard.profit_today, Money::from_major(10));

        assert_eq!(dashboard.sales_this_week.days.len(), 7);
        assert_eq!(dashboard.sales_this_week.total, Money::from_major(45));
        assert_eq!(dashboard.sales_this_week.days[4].total, Money::from_major(10));
        assert_eq!(dashboard.profits_this_week.total, Money::from_major(12));

        // teh: 12 - 3 = 9 left
        let low: Vec<i64> = dashboard.low_stock_products.iter().map(|p| p.id).collect();
        assert_eq!(low, [teh.id]);

        let top: Vec<(i64, i64)> = dashboard
            .top_products
            .iter()
            .map(|t| (t.product_id, t.total_qty))
            .collect();
        assert_eq!(top, [(kopi.id, 3), (teh.id, 3)]);
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let db = test_db().await;
        let today = Utc::now().date_naive();

        let dashboard = db.reports().dashboard(today, 10, 5).await.unwrap();

        assert_eq!(dashboard.transactions_today, 0);
        assert!(dashboard.revenue_today.is_zero());
        assert!(dashboard.sales_this_week.days.iter().all(|d| d.total.is_zero()));
        assert!(dashboard.top_products.is_empty());
    }
}
