//! # Reporting Types
//!
//! Read-side shapes for the sales, profit and dashboard endpoints, plus the
//! date-window arithmetic they share.
//!
//! ## Date Windows
//! ```text
//!   ?start_date=2024-03-01&end_date=2024-03-03
//!
//!   2024-03-01T00:00:00Z ───────────────────────────► 2024-03-04T00:00:00Z
//!   ▲ inclusive                                        ▲ exclusive
//!   │                                                  │
//!   start                                              end (= end_date + 1 day)
//! ```
//!
//! Comparing against the next midnight keeps the whole of `end_date`
//! (23:59:59.999…) inside the window without fiddling with sub-seconds.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::validation::{parse_date, ValidationResult};

/// Days covered by the dashboard charts, today included.
pub const DASHBOARD_DAYS: i64 = 7;

// =============================================================================
// Date Range
// =============================================================================

/// Half-open UTC window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Whole days from `first` through `last`, both inclusive.
    pub fn days(first: NaiveDate, last: NaiveDate) -> ValidationResult<Self> {
        if last < first {
            return Err(ValidationError::InvalidFormat {
                field: "end_date".to_string(),
                reason: "must not be before start_date".to_string(),
            });
        }

        Ok(Self {
            start: midnight(first),
            end: midnight(last + Duration::days(1)),
        })
    }

    /// Parses `start_date` / `end_date` query parameters.
    pub fn from_query(start_date: Option<&str>, end_date: Option<&str>) -> ValidationResult<Self> {
        let first = parse_date("start_date", start_date.unwrap_or(""))?;
        let last = parse_date("end_date", end_date.unwrap_or(""))?;
        Self::days(first, last)
    }

    /// The single day `day`.
    pub fn day(day: NaiveDate) -> Self {
        Self {
            start: midnight(day),
            end: midnight(day + Duration::days(1)),
        }
    }

    /// The last `n` days ending with `today`.
    pub fn last_days(today: NaiveDate, n: i64) -> Self {
        let first = today - Duration::days(n.max(1) - 1);
        Self {
            start: midnight(first),
            end: midnight(today + Duration::days(1)),
        }
    }

    /// Every calendar day in the window, in order.
    pub fn each_day(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        let end = self.end.date_naive();
        first.iter_days().take_while(move |d| *d < end)
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

// =============================================================================
// Sales & Profit Reports
// =============================================================================

/// A transaction row in the sales report.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    pub id: i64,
    pub invoice: String,
    pub cashier_id: i64,
    pub cashier_name: String,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub cash: Money,
    pub change: Money,
    pub discount: Money,
    pub grand_total: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub sales: Vec<SaleRecord>,
    /// Σ grand_total over `sales`.
    pub total: Money,
}

/// A profit row with the invoice it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProfitRecord {
    pub id: i64,
    pub transaction_id: i64,
    pub invoice: String,
    pub total: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitReport {
    pub profits: Vec<ProfitRecord>,
    /// Σ total over `profits`.
    pub total: Money,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Sum for one calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DailyTotal {
    pub date: String,
    pub total: Money,
}

/// A chart series plus its grand sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySeries {
    pub total: Money,
    pub days: Vec<DailyTotal>,
}

impl DailySeries {
    /// Lays `rows` over every day of `range`; days without rows read zero.
    pub fn fill(range: &DateRange, rows: &[DailyTotal]) -> Self {
        let days: Vec<DailyTotal> = range
            .each_day()
            .map(|day| {
                let date = day.format("%Y-%m-%d").to_string();
                let total = rows
                    .iter()
                    .filter(|r| r.date == date)
                    .map(|r| r.total)
                    .sum();
                DailyTotal { date, total }
            })
            .collect();

        Self {
            total: days.iter().map(|d| d.total).sum(),
            days,
        }
    }
}

/// Best seller by cumulative quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TopProduct {
    pub product_id: i64,
    pub title: String,
    pub total_qty: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dashboard {
    pub sales_this_week: DailySeries,
    pub profits_this_week: DailySeries,
    pub transactions_today: i64,
    pub revenue_today: Money,
    pub profit_today: Money,
    /// Products with `stock <= low_stock_threshold`.
    pub low_stock_products: Vec<Product>,
    pub top_products: Vec<TopProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_is_end_inclusive() {
        let range = DateRange::days(date(2024, 3, 1), date(2024, 3, 3)).unwrap();
        assert_eq!(range.start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(range.end.to_rfc3339(), "2024-03-04T00:00:00+00:00");

        let late = date(2024, 3, 3).and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
        assert!(late >= range.start && late < range.end);
    }

    #[test]
    fn test_days_rejects_inverted_window() {
        assert!(DateRange::days(date(2024, 3, 2), date(2024, 3, 1)).is_err());
        assert!(DateRange::days(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
    }

    #[test]
    fn test_from_query() {
        let range = DateRange::from_query(Some("2024-01-31"), Some("2024-02-01")).unwrap();
        assert_eq!(range.each_day().count(), 2);

        assert!(matches!(
            DateRange::from_query(None, Some("2024-02-01")),
            Err(ValidationError::Required { ref field }) if field == "start_date"
        ));
        assert!(DateRange::from_query(Some("2024-01-31"), Some("kemarin")).is_err());
    }

    #[test]
    fn test_last_days() {
        let range = DateRange::last_days(date(2024, 3, 7), DASHBOARD_DAYS);
        let days: Vec<_> = range.each_day().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2024, 3, 1));
        assert_eq!(days[6], date(2024, 3, 7));
    }

    #[test]
    fn test_daily_series_fills_gaps() {
        let range = DateRange::last_days(date(2024, 3, 3), 3);
        let rows = vec![
            DailyTotal {
                date: "2024-03-01".to_string(),
                total: Money::from_major(100),
            },
            DailyTotal {
                date: "2024-03-03".to_string(),
                total: Money::from_major(50),
            },
        ];

        let series = DailySeries::fill(&range, &rows);

        assert_eq!(series.total, Money::from_major(150));
        assert_eq!(
            series.days.iter().map(|d| d.date.as_str()).collect::<Vec<_>>(),
            vec!["2024-03-01", "2024-03-02", "2024-03-03"]
        );
        assert!(series.days[1].total.is_zero());
    }
}
