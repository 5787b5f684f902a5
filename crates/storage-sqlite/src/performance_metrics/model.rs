use chrono::NaiveDate;
use diesel::prelude::*;

use crate::utils::{parse_decimal, parse_optional_decimal};
use perfolio_core::errors::{Error, Result};
use perfolio_core::performance::PerformanceMetrics;

/// Deterministic row id for a `(calculation_date, benchmark_id)` pair, so
/// that `REPLACE INTO` behaves as an upsert even when `benchmark_id` is NULL.
///
/// Benchmarked rows carry a `benchmark:` prefix before the id, so no
/// benchmark id can collide with the portfolio-only key.
pub fn metrics_row_id(calculation_date: NaiveDate, benchmark_id: Option<&str>) -> String {
    let date = calculation_date.format("%Y-%m-%d");
    match benchmark_id {
        Some(id) => format!("{}_benchmark:{}", date, id),
        None => format!("{}_portfolio", date),
    }
}

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::performance_metrics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerformanceMetricsDB {
    pub id: String,
    pub calculation_date: NaiveDate,
    pub benchmark_id: Option<String>,
    pub period_days: i64,
    pub portfolio_return: String,
    pub annualized_return: String,
    pub benchmark_return: Option<String>,
    pub excess_return: Option<String>,
    pub volatility: String,
    pub sharpe_ratio: String,
    pub sortino_ratio: String,
    pub calmar_ratio: String,
    pub tracking_error: Option<String>,
    pub max_drawdown: String,
    pub var_95: String,
    pub var_99: String,
    pub risk_free_rate: String,
    pub created_at: String,
}

impl PerformanceMetricsDB {
    pub fn from_metrics(metrics: &PerformanceMetrics, created_at: &str) -> Self {
        Self {
            id: metrics_row_id(metrics.calculation_date, metrics.benchmark_id.as_deref()),
            calculation_date: metrics.calculation_date,
            benchmark_id: metrics.benchmark_id.clone(),
            period_days: metrics.period_days,
            portfolio_return: metrics.portfolio_return.to_string(),
            annualized_return: metrics.annualized_return.to_string(),
            benchmark_return: metrics.benchmark_return.map(|v| v.to_string()),
            excess_return: metrics.excess_return.map(|v| v.to_string()),
            volatility: metrics.volatility.to_string(),
            sharpe_ratio: metrics.sharpe_ratio.to_string(),
            sortino_ratio: metrics.sortino_ratio.to_string(),
            calmar_ratio: metrics.calmar_ratio.to_string(),
            tracking_error: metrics.tracking_error.map(|v| v.to_string()),
            max_drawdown: metrics.max_drawdown.to_string(),
            var_95: metrics.var_95.to_string(),
            var_99: metrics.var_99.to_string(),
            risk_free_rate: metrics.risk_free_rate.to_string(),
            created_at: created_at.to_string(),
        }
    }
}

impl TryFrom<PerformanceMetricsDB> for PerformanceMetrics {
    type Error = Error;

    fn try_from(db: PerformanceMetricsDB) -> Result<Self> {
        let column = |name: &str| format!("performance_metrics.{}", name);
        Ok(PerformanceMetrics {
            calculation_date: db.calculation_date,
            period_days: db.period_days,
            portfolio_return: parse_decimal(&column("portfolio_return"), &db.portfolio_return)?,
            annualized_return: parse_decimal(&column("annualized_return"), &db.annualized_return)?,
            benchmark_return: parse_optional_decimal(
                &column("benchmark_return"),
                db.benchmark_return.as_deref(),
            )?,
            excess_return: parse_optional_decimal(
                &column("excess_return"),
                db.excess_return.as_deref(),
            )?,
            volatility: parse_decimal(&column("volatility"), &db.volatility)?,
            sharpe_ratio: parse_decimal(&column("sharpe_ratio"), &db.sharpe_ratio)?,
            sortino_ratio: parse_decimal(&column("sortino_ratio"), &db.sortino_ratio)?,
            calmar_ratio: parse_decimal(&column("calmar_ratio"), &db.calmar_ratio)?,
            tracking_error: parse_optional_decimal(
                &column("tracking_error"),
                db.tracking_error.as_deref(),
            )?,
            max_drawdown: parse_decimal(&column("max_drawdown"), &db.max_drawdown)?,
            var_95: parse_decimal(&column("var_95"), &db.var_95)?,
            var_99: parse_decimal(&column("var_99"), &db.var_99)?,
            risk_free_rate: parse_decimal(&column("risk_free_rate"), &db.risk_free_rate)?,
            benchmark_id: db.benchmark_id,
        })
    }
}
