//! Collaborator contracts and the engine's public interface.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{BenchmarkInfo, BenchmarkPrice, ComparisonResult, PerformanceMetrics, ValuationPoint};
use crate::errors::Result;
use crate::statistics::RiskMetrics;

/// Source of the aggregate portfolio valuation history.
#[async_trait]
pub trait PortfolioValuationProviderTrait: Send + Sync {
    /// Daily total values with `start <= date <= end`, ascending by date.
    async fn get_historical_values(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ValuationPoint>>;
}

/// Source of benchmark metadata and closing prices.
#[async_trait]
pub trait BenchmarkPriceProviderTrait: Send + Sync {
    /// Closing prices with `start <= date <= end`, ascending by timestamp.
    async fn get_range(
        &self,
        benchmark_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BenchmarkPrice>>;

    /// `None` when the benchmark id is unknown.
    async fn get_info(&self, benchmark_id: &str) -> Result<Option<BenchmarkInfo>>;
}

/// Persistence for computed performance snapshots.
#[async_trait]
pub trait PerformanceMetricsStoreTrait: Send + Sync {
    /// Inserts or replaces the row keyed by `(calculation_date, benchmark_id)`.
    async fn upsert(&self, metrics: &PerformanceMetrics) -> Result<()>;
}

/// Public interface of the performance analysis engine.
#[async_trait]
pub trait PerformanceAnalysisServiceTrait: Send + Sync {
    /// Portfolio-only metrics over `[start_date, end_date]`.
    ///
    /// Fails with `NoData` when the valuation history is empty.
    async fn calculate_portfolio_metrics(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PerformanceMetrics>;

    /// Portfolio metrics with the benchmark-relative fields filled in.
    async fn calculate_benchmarked_metrics(
        &self,
        benchmark_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PerformanceMetrics>;

    /// Portfolio versus benchmark over their common trading days.
    ///
    /// Fails with `NotFound` for an unknown benchmark and `InsufficientData`
    /// when fewer than the configured minimum of days align.
    async fn compare_with_benchmark(
        &self,
        benchmark_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ComparisonResult>;

    /// Runs one comparison per benchmark concurrently, in input order.
    async fn compare_with_benchmarks(
        &self,
        benchmark_ids: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<(String, Result<ComparisonResult>)>;

    /// Standalone risk profile of any return series. Fails with `EmptyInput`
    /// on an empty slice.
    fn calculate_risk_metrics(&self, returns: &[Decimal]) -> Result<RiskMetrics>;

    async fn save_performance_metrics(&self, metrics: &PerformanceMetrics) -> Result<()>;
}
