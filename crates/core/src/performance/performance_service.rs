use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::{join, join_all};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    AnalysisPeriod, BenchmarkInfo, BenchmarkPriceProviderTrait, BenchmarkSummary,
    ComparisonResult, PerformanceAnalysisServiceTrait, PerformanceMetrics,
    PerformanceMetricsStoreTrait, PortfolioValuationProviderTrait, SeriesSummary,
};
use crate::benchmark::{compare_returns, ensure_min_observations, ComparisonInputs};
use crate::config::AnalyticsConfig;
use crate::constants::{VAR_95_CONFIDENCE, VAR_99_CONFIDENCE};
use crate::errors::{AnalyticsError, OperationContext, Result};
use crate::ratios::{calmar_ratio, sharpe_ratio, sortino_ratio};
use crate::returns::{align, daily_returns, return_values, AlignedReturns, ValuePoint};
use crate::risk_free::{RiskFreeRateProvider, RiskFreeRateStoreTrait};
use crate::statistics::{
    annualized_return, compute_risk_metrics, downside_deviation, ensure_finite_growth,
    ensure_finite_moments, max_drawdown, total_return, value_at_risk, volatility, RiskMetrics,
};

/// Headline statistics of one return series over a period.
struct SeriesAnalysis {
    total_return: Decimal,
    annualized_return: Decimal,
    volatility: Decimal,
    max_drawdown: Decimal,
    sharpe_ratio: Decimal,
    sortino_ratio: Decimal,
    calmar_ratio: Decimal,
}

impl SeriesAnalysis {
    /// The annualized return is rounded to `precision` before the ratios and
    /// relative figures are derived from it, so every reported figure agrees
    /// with the reported annualized return.
    fn of(
        context: &OperationContext,
        returns: &[Decimal],
        days: i64,
        risk_free_rate: Decimal,
        precision: u32,
    ) -> Result<Self> {
        ensure_finite_growth(returns, context)?;
        ensure_finite_moments(returns, context)?;

        let total = total_return(returns);
        let annualized = annualized_return(total, days).round_dp(precision);
        let volatility = volatility(returns);
        let downside = downside_deviation(returns, Decimal::ZERO);
        let drawdown = max_drawdown(returns);

        Ok(Self {
            total_return: total * dec!(100),
            annualized_return: annualized,
            volatility,
            max_drawdown: drawdown,
            sharpe_ratio: sharpe_ratio(annualized, volatility, risk_free_rate),
            sortino_ratio: sortino_ratio(annualized, downside, risk_free_rate),
            calmar_ratio: calmar_ratio(annualized, drawdown),
        })
    }

    fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            total_return: self.total_return,
            annualized_return: self.annualized_return,
            volatility: self.volatility,
            sharpe_ratio: self.sharpe_ratio,
            max_drawdown: self.max_drawdown,
        }
    }
}

/// Computes portfolio performance, risk and benchmark-relative metrics.
///
/// Stateless between calls: every operation fetches what it needs from the
/// injected collaborators and returns a fresh result.
pub struct PerformanceAnalysisService {
    valuation_provider: Arc<dyn PortfolioValuationProviderTrait>,
    benchmark_provider: Arc<dyn BenchmarkPriceProviderTrait>,
    metrics_store: Arc<dyn PerformanceMetricsStoreTrait>,
    risk_free: RiskFreeRateProvider,
    config: AnalyticsConfig,
}

impl PerformanceAnalysisService {
    pub fn new(
        valuation_provider: Arc<dyn PortfolioValuationProviderTrait>,
        benchmark_provider: Arc<dyn BenchmarkPriceProviderTrait>,
        rate_store: Arc<dyn RiskFreeRateStoreTrait>,
        metrics_store: Arc<dyn PerformanceMetricsStoreTrait>,
        config: AnalyticsConfig,
    ) -> Self {
        let risk_free = RiskFreeRateProvider::new(rate_store, config.fallback_risk_free_rate);
        Self {
            valuation_provider,
            benchmark_provider,
            metrics_store,
            risk_free,
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    fn ensure_range(context: &OperationContext, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start > end {
            return Err(AnalyticsError::invalid_input(
                context.clone(),
                format!("start date {} is after end date {}", start, end),
            )
            .into());
        }
        Ok(())
    }

    /// Sorts ascending and keeps the last point of any repeated date.
    fn normalize_history(mut points: Vec<ValuePoint>) -> Vec<ValuePoint> {
        points.sort_by_key(|p| p.date);
        points.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                *earlier = *later;
                true
            } else {
                false
            }
        });
        points
    }

    async fn load_portfolio_history(
        &self,
        context: &OperationContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ValuePoint>> {
        let valuations = self
            .valuation_provider
            .get_historical_values(start, end)
            .await
            .map_err(|e| AnalyticsError::external(context.clone(), &e))?;

        Ok(Self::normalize_history(
            valuations
                .into_iter()
                .map(|v| ValuePoint::new(v.date, v.total_value))
                .collect(),
        ))
    }

    async fn load_benchmark_history(
        &self,
        context: &OperationContext,
        benchmark_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(BenchmarkInfo, Vec<ValuePoint>)> {
        let info = match self.benchmark_provider.get_info(benchmark_id).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                return Err(AnalyticsError::NotFound {
                    context: context.clone(),
                    benchmark_id: benchmark_id.to_string(),
                }
                .into())
            }
            Err(e) => return Err(AnalyticsError::external(context.clone(), &e).into()),
        };

        let prices = self
            .benchmark_provider
            .get_range(benchmark_id, start, end)
            .await
            .map_err(|e| AnalyticsError::external(context.clone(), &e))?;

        let points = Self::normalize_history(
            prices
                .into_iter()
                .map(|p| ValuePoint::new(p.timestamp.date_naive(), p.close_price))
                .collect(),
        );
        Ok((info, points))
    }

    /// Daily returns of both histories joined on their common dates, gated
    /// on the configured minimum sample.
    fn aligned_returns(
        &self,
        context: &OperationContext,
        portfolio_history: &[ValuePoint],
        benchmark_history: &[ValuePoint],
    ) -> Result<AlignedReturns> {
        let portfolio = daily_returns(portfolio_history).map_err(|e| e.within(context))?;
        let benchmark = daily_returns(benchmark_history).map_err(|e| e.within(context))?;
        let aligned = align(&portfolio, &benchmark);

        if aligned.len() < portfolio.len().min(benchmark.len()) {
            warn!(
                "{}: only {} of {} portfolio and {} benchmark returns share a date",
                context,
                aligned.len(),
                portfolio.len(),
                benchmark.len()
            );
        }

        ensure_min_observations(
            aligned.len(),
            self.config.min_benchmark_observations.max(1),
            context,
        )?;
        Ok(aligned)
    }

    fn portfolio_metrics(
        &self,
        context: &OperationContext,
        calculation_date: NaiveDate,
        history: &[ValuePoint],
        risk_free_rate: Decimal,
    ) -> Result<PerformanceMetrics> {
        let observations = daily_returns(history).map_err(|e| e.within(context))?;
        let returns = return_values(&observations);
        let period_days = match (history.first(), history.last()) {
            (Some(first), Some(last)) => AnalysisPeriod::between(first.date, last.date).days,
            _ => 1,
        };
        let analysis = SeriesAnalysis::of(
            context,
            &returns,
            period_days,
            risk_free_rate,
            self.config.decimal_precision,
        )?;

        let metrics = PerformanceMetrics {
            calculation_date,
            benchmark_id: None,
            period_days,
            portfolio_return: analysis.total_return,
            annualized_return: analysis.annualized_return,
            benchmark_return: None,
            excess_return: None,
            volatility: analysis.volatility,
            sharpe_ratio: analysis.sharpe_ratio,
            sortino_ratio: analysis.sortino_ratio,
            calmar_ratio: analysis.calmar_ratio,
            tracking_error: None,
            max_drawdown: analysis.max_drawdown,
            var_95: value_at_risk(&returns, VAR_95_CONFIDENCE),
            var_99: value_at_risk(&returns, VAR_99_CONFIDENCE),
            risk_free_rate,
        };
        Ok(metrics.round_dp(self.config.decimal_precision))
    }

    fn comparison(
        &self,
        context: &OperationContext,
        info: BenchmarkInfo,
        aligned: &AlignedReturns,
        risk_free_rate: Decimal,
    ) -> Result<ComparisonResult> {
        let period = match (aligned.start_date(), aligned.last_date()) {
            (Some(first), Some(last)) => AnalysisPeriod::between(first, last),
            _ => {
                return Err(AnalyticsError::InsufficientData {
                    context: context.clone(),
                    required: self.config.min_benchmark_observations.max(1),
                    actual: 0,
                }
                .into())
            }
        };

        let portfolio_returns = return_values(&aligned.a);
        let benchmark_returns = return_values(&aligned.b);
        let precision = self.config.decimal_precision;
        let portfolio =
            SeriesAnalysis::of(context, &portfolio_returns, period.days, risk_free_rate, precision)?;
        let benchmark =
            SeriesAnalysis::of(context, &benchmark_returns, period.days, risk_free_rate, precision)?;

        let comparison = compare_returns(
            &portfolio_returns,
            &benchmark_returns,
            ComparisonInputs {
                portfolio_annualized_return: portfolio.annualized_return,
                benchmark_annualized_return: benchmark.annualized_return,
                risk_free_rate,
            },
            self.config.min_benchmark_observations,
            context,
        )?;

        let result = ComparisonResult {
            portfolio: portfolio.summary(),
            benchmark: BenchmarkSummary {
                symbol: info.symbol,
                name: info.name,
                summary: benchmark.summary(),
            },
            comparison,
            period,
        };
        Ok(result.round_dp(self.config.decimal_precision))
    }
}

#[async_trait]
impl PerformanceAnalysisServiceTrait for PerformanceAnalysisService {
    async fn calculate_portfolio_metrics(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PerformanceMetrics> {
        let context =
            OperationContext::with_period("calculate_portfolio_metrics", start_date, end_date);
        Self::ensure_range(&context, start_date, end_date)?;
        debug!("Calculating portfolio metrics for {}", context);

        let history = self
            .load_portfolio_history(&context, start_date, end_date)
            .await?;
        if history.is_empty() {
            return Err(AnalyticsError::NoData { context }.into());
        }

        let rate = self
            .risk_free
            .resolve(end_date, &self.config.risk_free_country)
            .await;
        self.portfolio_metrics(&context, end_date, &history, rate.annual_rate)
    }

    async fn calculate_benchmarked_metrics(
        &self,
        benchmark_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PerformanceMetrics> {
        let context =
            OperationContext::with_period("calculate_benchmarked_metrics", start_date, end_date);
        Self::ensure_range(&context, start_date, end_date)?;
        debug!(
            "Calculating portfolio metrics against '{}' for {}",
            benchmark_id, context
        );

        let (portfolio, benchmark) = join(
            self.load_portfolio_history(&context, start_date, end_date),
            self.load_benchmark_history(&context, benchmark_id, start_date, end_date),
        )
        .await;
        let (info, benchmark_history) = benchmark?;
        let portfolio_history = portfolio?;
        if portfolio_history.is_empty() {
            return Err(AnalyticsError::NoData { context }.into());
        }

        let aligned = self.aligned_returns(&context, &portfolio_history, &benchmark_history)?;
        let rate = self
            .risk_free
            .resolve(end_date, &self.config.risk_free_country)
            .await;

        let comparison = self.comparison(&context, info, &aligned, rate.annual_rate)?;
        let metrics =
            self.portfolio_metrics(&context, end_date, &portfolio_history, rate.annual_rate)?;

        // The record's excess is taken against its own annualized return; it
        // only differs from the comparison's when alignment dropped dates.
        let benchmark_return = comparison.benchmark.summary.annualized_return;
        Ok(PerformanceMetrics {
            benchmark_id: Some(benchmark_id.to_string()),
            benchmark_return: Some(benchmark_return),
            excess_return: Some(metrics.annualized_return.saturating_sub(benchmark_return)),
            tracking_error: Some(comparison.comparison.tracking_error),
            ..metrics
        })
    }

    async fn compare_with_benchmark(
        &self,
        benchmark_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ComparisonResult> {
        let context = OperationContext::with_period("compare_with_benchmark", start_date, end_date);
        Self::ensure_range(&context, start_date, end_date)?;
        debug!("Comparing portfolio with '{}' for {}", benchmark_id, context);

        let (portfolio, benchmark) = join(
            self.load_portfolio_history(&context, start_date, end_date),
            self.load_benchmark_history(&context, benchmark_id, start_date, end_date),
        )
        .await;
        let (info, benchmark_history) = benchmark?;
        let portfolio_history = portfolio?;

        let aligned = self.aligned_returns(&context, &portfolio_history, &benchmark_history)?;
        let rate = self
            .risk_free
            .resolve(end_date, &self.config.risk_free_country)
            .await;

        self.comparison(&context, info, &aligned, rate.annual_rate)
    }

    async fn compare_with_benchmarks(
        &self,
        benchmark_ids: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<(String, Result<ComparisonResult>)> {
        debug!(
            "Comparing portfolio with {} benchmarks from {} to {}",
            benchmark_ids.len(),
            start_date,
            end_date
        );

        let comparisons = benchmark_ids.iter().map(|benchmark_id| async move {
            let result = self
                .compare_with_benchmark(benchmark_id, start_date, end_date)
                .await;
            if let Err(e) = &result {
                warn!("Benchmark comparison for '{}' failed: {}", benchmark_id, e);
            }
            (benchmark_id.clone(), result)
        });

        join_all(comparisons).await
    }

    fn calculate_risk_metrics(&self, returns: &[Decimal]) -> Result<RiskMetrics> {
        let context = OperationContext::new("calculate_risk_metrics");
        if returns.is_empty() {
            return Err(AnalyticsError::EmptyInput { context }.into());
        }
        ensure_finite_moments(returns, &context)?;
        Ok(compute_risk_metrics(returns).round_dp(self.config.decimal_precision))
    }

    async fn save_performance_metrics(&self, metrics: &PerformanceMetrics) -> Result<()> {
        let context = OperationContext::with_period(
            "save_performance_metrics",
            metrics.calculation_date,
            metrics.calculation_date,
        );
        debug!(
            "Saving performance metrics for {} (benchmark {:?})",
            metrics.calculation_date, metrics.benchmark_id
        );

        self.metrics_store
            .upsert(metrics)
            .await
            .map_err(|e| AnalyticsError::external(context, &e).into())
    }
}
