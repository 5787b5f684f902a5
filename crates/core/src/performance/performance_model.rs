use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::benchmark::ComparisonMetrics;

/// Total portfolio value on one day, as supplied by the valuation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub total_value: Decimal,
}

/// Benchmark close as supplied by the price provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkPrice {
    pub timestamp: DateTime<Utc>,
    pub close_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkInfo {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Persisted performance snapshot, upserted by `(calculation_date, benchmark_id)`.
///
/// Returns, volatility, drawdown and VaR are in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub calculation_date: NaiveDate,
    pub benchmark_id: Option<String>,
    pub period_days: i64,
    /// Compounded return over the period.
    pub portfolio_return: Decimal,
    pub annualized_return: Decimal,
    /// Benchmark annualized return over the aligned period.
    pub benchmark_return: Option<Decimal>,
    /// Portfolio minus benchmark annualized return.
    pub excess_return: Option<Decimal>,
    pub volatility: Decimal,
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    pub calmar_ratio: Decimal,
    pub tracking_error: Option<Decimal>,
    pub max_drawdown: Decimal,
    pub var_95: Decimal,
    pub var_99: Decimal,
    /// Annual risk-free rate the ratios were computed with.
    pub risk_free_rate: Decimal,
}

impl PerformanceMetrics {
    pub fn round_dp(self, dp: u32) -> Self {
        Self {
            portfolio_return: self.portfolio_return.round_dp(dp),
            annualized_return: self.annualized_return.round_dp(dp),
            benchmark_return: self.benchmark_return.map(|v| v.round_dp(dp)),
            excess_return: self.excess_return.map(|v| v.round_dp(dp)),
            volatility: self.volatility.round_dp(dp),
            sharpe_ratio: self.sharpe_ratio.round_dp(dp),
            sortino_ratio: self.sortino_ratio.round_dp(dp),
            calmar_ratio: self.calmar_ratio.round_dp(dp),
            tracking_error: self.tracking_error.map(|v| v.round_dp(dp)),
            max_drawdown: self.max_drawdown.round_dp(dp),
            var_95: self.var_95.round_dp(dp),
            var_99: self.var_99.round_dp(dp),
            risk_free_rate: self.risk_free_rate.round_dp(dp),
            ..self
        }
    }
}

/// Headline metrics of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub total_return: Decimal,
    pub annualized_return: Decimal,
    pub volatility: Decimal,
    pub sharpe_ratio: Decimal,
    pub max_drawdown: Decimal,
}

impl SeriesSummary {
    pub fn round_dp(self, dp: u32) -> Self {
        Self {
            total_return: self.total_return.round_dp(dp),
            annualized_return: self.annualized_return.round_dp(dp),
            volatility: self.volatility.round_dp(dp),
            sharpe_ratio: self.sharpe_ratio.round_dp(dp),
            max_drawdown: self.max_drawdown.round_dp(dp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
    pub symbol: String,
    pub name: String,
    #[serde(flatten)]
    pub summary: SeriesSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
}

impl AnalysisPeriod {
    /// Span between two observed dates, never shorter than one day.
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            days: (end_date - start_date).num_days().max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub portfolio: SeriesSummary,
    pub benchmark: BenchmarkSummary,
    pub comparison: ComparisonMetrics,
    pub period: AnalysisPeriod,
}

impl ComparisonResult {
    pub fn round_dp(self, dp: u32) -> Self {
        Self {
            portfolio: self.portfolio.round_dp(dp),
            benchmark: BenchmarkSummary {
                summary: self.benchmark.summary.round_dp(dp),
                ..self.benchmark
            },
            comparison: self.comparison.round_dp(dp),
            period: self.period,
        }
    }
}
