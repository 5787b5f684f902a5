//! Beta, alpha, correlation, R², tracking error and information ratio.
//!
//! The free functions operate on already-aligned, equal-length series and
//! degrade to their documented defaults on degenerate input.
//! [`compare_returns`] is the gated entry point: it refuses to compute
//! anything below the minimum sample size.

use rust_decimal::Decimal;

use super::{ComparisonInputs, ComparisonMetrics};
use crate::errors::{AnalyticsError, OperationContext, Result};
use crate::statistics::{
    ensure_finite_moments, sample_covariance, sample_std_dev, sample_variance, volatility,
};

/// `cov(p, b) / var(b)`; `1` below two points or when the benchmark has no
/// variance.
pub fn beta(portfolio: &[Decimal], benchmark: &[Decimal]) -> Decimal {
    let n = portfolio.len().min(benchmark.len());
    if n < 2 {
        return Decimal::ONE;
    }
    let benchmark_variance = sample_variance(&benchmark[..n]);
    if benchmark_variance.is_zero() {
        return Decimal::ONE;
    }
    sample_covariance(portfolio, benchmark)
        .checked_div(benchmark_variance)
        .unwrap_or(Decimal::ONE)
}

/// CAPM residual: `p - (rf + beta * (b - rf))`.
pub fn alpha(
    portfolio_annualized_return: Decimal,
    benchmark_annualized_return: Decimal,
    beta: Decimal,
    risk_free_rate: Decimal,
) -> Decimal {
    let expected = beta
        .saturating_mul(benchmark_annualized_return - risk_free_rate)
        .saturating_add(risk_free_rate);
    portfolio_annualized_return.saturating_sub(expected)
}

/// Pearson correlation, clamped to `[-1, 1]`; `0` below two points or when
/// either series has no dispersion.
pub fn correlation(portfolio: &[Decimal], benchmark: &[Decimal]) -> Decimal {
    let n = portfolio.len().min(benchmark.len());
    if n < 2 {
        return Decimal::ZERO;
    }
    let std_p = sample_std_dev(&portfolio[..n]);
    let std_b = sample_std_dev(&benchmark[..n]);
    if std_p.is_zero() || std_b.is_zero() {
        return Decimal::ZERO;
    }
    let raw = std_p
        .checked_mul(std_b)
        .and_then(|denominator| sample_covariance(portfolio, benchmark).checked_div(denominator))
        .unwrap_or(Decimal::ZERO);
    raw.max(Decimal::NEGATIVE_ONE).min(Decimal::ONE)
}

pub fn r_squared(correlation: Decimal) -> Decimal {
    correlation * correlation
}

/// Annualized volatility of the element-wise difference `p - b`.
pub fn tracking_error(portfolio: &[Decimal], benchmark: &[Decimal]) -> Decimal {
    let differences: Vec<Decimal> = portfolio
        .iter()
        .zip(benchmark.iter())
        .map(|(p, b)| p.saturating_sub(*b))
        .collect();
    volatility(&differences)
}

/// `excess_return / tracking_error`; `0` when tracking error is zero.
pub fn information_ratio(excess_return: Decimal, tracking_error: Decimal) -> Decimal {
    excess_return
        .checked_div(tracking_error)
        .unwrap_or(Decimal::ZERO)
}

/// Rejects a sample of `actual` aligned points below `required`.
pub fn ensure_min_observations(
    actual: usize,
    required: usize,
    context: &OperationContext,
) -> Result<()> {
    if actual < required {
        return Err(AnalyticsError::InsufficientData {
            context: context.clone(),
            required,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Computes the full comparison block after enforcing the sample gate.
///
/// Fails with `InputValidation` if the series lengths differ or their moments
/// leave the decimal range, and with `InsufficientData` if fewer than
/// `min_observations` points are available.
pub fn compare_returns(
    portfolio: &[Decimal],
    benchmark: &[Decimal],
    inputs: ComparisonInputs,
    min_observations: usize,
    context: &OperationContext,
) -> Result<ComparisonMetrics> {
    if portfolio.len() != benchmark.len() {
        return Err(AnalyticsError::invalid_input(
            context.clone(),
            format!(
                "aligned series differ in length ({} vs {})",
                portfolio.len(),
                benchmark.len()
            ),
        )
        .into());
    }
    ensure_min_observations(portfolio.len(), min_observations, context)?;
    ensure_finite_moments(portfolio, context)?;
    ensure_finite_moments(benchmark, context)?;

    let beta = beta(portfolio, benchmark);
    let correlation = correlation(portfolio, benchmark);
    let tracking_error = tracking_error(portfolio, benchmark);
    let excess_return = inputs
        .portfolio_annualized_return
        .saturating_sub(inputs.benchmark_annualized_return);

    Ok(ComparisonMetrics {
        excess_return,
        tracking_error,
        information_ratio: information_ratio(excess_return, tracking_error),
        beta,
        alpha: alpha(
            inputs.portfolio_annualized_return,
            inputs.benchmark_annualized_return,
            beta,
            inputs.risk_free_rate,
        ),
        r_squared: r_squared(correlation),
        correlation,
    })
}
