//! Pure statistical primitives over daily percentage returns.
//!
//! Every function takes `&[Decimal]` percentages (`1.5` = 1.5%) and never
//! mutates its input. Degenerate inputs degrade to a documented default
//! instead of failing, and arithmetic that would leave the `Decimal` range
//! saturates or degrades with a warning. Entry points that must not report a
//! saturated figure check the series first with [`ensure_finite_growth`] and
//! [`ensure_finite_moments`].

use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use super::RiskMetrics;
use crate::constants::{
    DAYS_PER_YEAR, SQRT_TRADING_DAYS_APPROX, TRADING_DAYS_PER_YEAR, VAR_95_CONFIDENCE,
    VAR_99_CONFIDENCE,
};
use crate::errors::{AnalyticsError, OperationContext, Result};

const HUNDRED: Decimal = dec!(100);

/// Compounded return of the series as a fraction: `Π(1 + r/100) - 1`.
///
/// Saturates at `Decimal::MAX` when the growth factor leaves the decimal
/// range.
pub fn total_return(returns: &[Decimal]) -> Decimal {
    match compounded_growth(returns) {
        Some(growth) => growth.saturating_sub(Decimal::ONE),
        None => {
            warn!(
                "Compounding {} returns overflowed; saturating the total return",
                returns.len()
            );
            Decimal::MAX
        }
    }
}

/// Annualizes a fractional total return over `days` calendar days, in percent.
///
/// `((1 + total_return)^(365 / days) - 1) * 100`. A total loss (`<= -1`) is
/// reported as -100%; a non-positive `days` or an exponent that overflows
/// falls back to the un-annualized percentage.
pub fn annualized_return(total_return: Decimal, days: i64) -> Decimal {
    if total_return <= dec!(-1) {
        return dec!(-100);
    }
    if days <= 0 {
        return total_return.saturating_mul(HUNDRED);
    }

    let exponent = Decimal::from(DAYS_PER_YEAR) / Decimal::from(days);
    let annualized = Decimal::ONE
        .checked_add(total_return)
        .and_then(|base| base.checked_powd(exponent))
        .and_then(|growth| (growth - Decimal::ONE).checked_mul(HUNDRED));

    match annualized {
        Some(annualized) => annualized,
        None => {
            warn!(
                "Annualizing a {} total return over {} days overflowed; reporting the period return",
                total_return, days
            );
            total_return.saturating_mul(HUNDRED)
        }
    }
}

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len());
    match values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
    {
        Some(sum) => sum / n,
        // Dividing first keeps every partial sum in range.
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v / n)),
    }
}

/// Sample variance with an `n - 1` denominator; zero below two points.
///
/// Saturates at `Decimal::MAX` when the squared deviations leave the decimal
/// range.
pub fn sample_variance(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    match sum_of_squared_deviations(values, mean(values)) {
        Some(sum) => (sum / Decimal::from(values.len() - 1)).max(Decimal::ZERO),
        None => {
            warn!(
                "Variance of {} observations overflowed; saturating",
                values.len()
            );
            Decimal::MAX
        }
    }
}

pub fn sample_std_dev(values: &[Decimal]) -> Decimal {
    sqrt_or_zero(sample_variance(values))
}

/// Sample covariance with an `n - 1` denominator over equal-length series.
///
/// Only the common prefix is used if the lengths differ; zero below two
/// points or when the cross products leave the decimal range.
pub fn sample_covariance(a: &[Decimal], b: &[Decimal]) -> Decimal {
    let n = a.len().min(b.len());
    if n < 2 {
        return Decimal::ZERO;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = mean(a);
    let mean_b = mean(b);
    let sum_products = a.iter().zip(b.iter()).try_fold(Decimal::ZERO, |acc, (&x, &y)| {
        let dx = x.checked_sub(mean_a)?;
        let dy = y.checked_sub(mean_b)?;
        acc.checked_add(dx.checked_mul(dy)?)
    });

    match sum_products {
        Some(sum) => sum / Decimal::from(n - 1),
        None => {
            warn!("Covariance of {} observation pairs overflowed; reporting zero", n);
            Decimal::ZERO
        }
    }
}

/// Annualized volatility: sample standard deviation `* sqrt(252)`.
///
/// Returns zero for fewer than two observations.
pub fn volatility(returns: &[Decimal]) -> Decimal {
    if returns.len() < 2 {
        return Decimal::ZERO;
    }
    sample_std_dev(returns) * annualization_factor()
}

/// Annualized downside deviation relative to `target`.
///
/// Only observations below the target contribute; their deviations from the
/// target are squared and averaged before the square root. Zero when no
/// observation falls below the target.
pub fn downside_deviation(returns: &[Decimal], target: Decimal) -> Decimal {
    let shortfalls: Vec<Decimal> = returns
        .iter()
        .map(|&r| r.saturating_sub(target))
        .filter(|d| *d < Decimal::ZERO)
        .collect();

    if shortfalls.is_empty() {
        return Decimal::ZERO;
    }

    let mean_square = match sum_of_squared_deviations(&shortfalls, Decimal::ZERO) {
        Some(sum) => sum / Decimal::from(shortfalls.len()),
        None => {
            warn!(
                "Downside deviation of {} shortfalls overflowed; saturating",
                shortfalls.len()
            );
            Decimal::MAX
        }
    };
    sqrt_or_zero(mean_square).saturating_mul(annualization_factor())
}

/// Largest peak-to-trough decline of the compounded series, in percent.
///
/// Wealth is tracked relative to its running peak, so the walk stays within
/// `[0, 1]` however far the series compounds. Wealth cannot fall below zero:
/// a loss of 100% or more is a 100% drawdown.
pub fn max_drawdown(returns: &[Decimal]) -> Decimal {
    relative_to_peak(returns)
        .map(|(ratio, _)| Decimal::ONE - ratio)
        .fold(Decimal::ZERO, |worst, drawdown| worst.max(drawdown))
        * HUNDRED
}

/// Longest run of consecutive days without a new high-water mark.
///
/// The counter resets only on the day a strictly higher peak is set, so a
/// recovery that merely touches the previous peak keeps the run going.
pub fn max_drawdown_duration(returns: &[Decimal]) -> u32 {
    let mut current: u32 = 0;
    let mut longest: u32 = 0;

    for (_, new_peak) in relative_to_peak(returns) {
        if new_peak {
            current = 0;
        } else {
            current = current.saturating_add(1);
            longest = longest.max(current);
        }
    }

    longest
}

/// Historical (non-parametric) Value-at-Risk.
///
/// Sorts a copy ascending and returns the observation at
/// `floor(confidence * n)`; `confidence = 0.05` is the 95% VaR. Zero for an
/// empty series.
pub fn value_at_risk(returns: &[Decimal], confidence: Decimal) -> Decimal {
    let sorted = sorted_ascending(returns);
    match tail_index(sorted.len(), confidence) {
        Some(index) => sorted[index],
        None => Decimal::ZERO,
    }
}

/// Mean of every observation at or below the VaR index (inclusive).
pub fn expected_shortfall(returns: &[Decimal], confidence: Decimal) -> Decimal {
    let sorted = sorted_ascending(returns);
    match tail_index(sorted.len(), confidence) {
        Some(index) => mean(&sorted[..=index]),
        None => Decimal::ZERO,
    }
}

/// Population skewness (third standardized moment).
///
/// Zero below three observations or when the series has no dispersion.
pub fn skewness(returns: &[Decimal]) -> Decimal {
    if returns.len() < 3 {
        return Decimal::ZERO;
    }
    let Some((m2, m3, _)) = central_moments(returns) else {
        warn!("Skewness of {} observations overflowed; reporting zero", returns.len());
        return Decimal::ZERO;
    };
    let std_dev = sqrt_or_zero(m2);
    if std_dev.is_zero() {
        return Decimal::ZERO;
    }
    m2.checked_mul(std_dev)
        .and_then(|denominator| m3.checked_div(denominator))
        .unwrap_or(Decimal::ZERO)
}

/// Population excess kurtosis (fourth standardized moment minus 3).
///
/// Zero below four observations or when the series has no dispersion.
pub fn kurtosis(returns: &[Decimal]) -> Decimal {
    if returns.len() < 4 {
        return Decimal::ZERO;
    }
    let Some((m2, _, m4)) = central_moments(returns) else {
        warn!("Kurtosis of {} observations overflowed; reporting zero", returns.len());
        return Decimal::ZERO;
    };
    if m2.is_zero() {
        return Decimal::ZERO;
    }
    m2.checked_mul(m2)
        .and_then(|denominator| m4.checked_div(denominator))
        .map(|standardized| standardized - dec!(3))
        .unwrap_or(Decimal::ZERO)
}

/// Rejects a series whose compounded growth, in percent, leaves the decimal
/// range.
pub fn ensure_finite_growth(returns: &[Decimal], context: &OperationContext) -> Result<()> {
    let fits = compounded_growth(returns)
        .and_then(|growth| growth.checked_mul(HUNDRED))
        .is_some();
    if !fits {
        return Err(AnalyticsError::invalid_input(
            context.clone(),
            format!(
                "compounding {} returns exceeds the decimal range",
                returns.len()
            ),
        )
        .into());
    }
    Ok(())
}

/// Rejects a series whose squared returns or central moments leave the
/// decimal range.
pub fn ensure_finite_moments(returns: &[Decimal], context: &OperationContext) -> Result<()> {
    let fits = sum_of_squared_deviations(returns, Decimal::ZERO).is_some()
        && (returns.len() < 2 || central_moments(returns).is_some());
    if !fits {
        return Err(AnalyticsError::invalid_input(
            context.clone(),
            format!(
                "moments of {} returns exceed the decimal range",
                returns.len()
            ),
        )
        .into());
    }
    Ok(())
}

/// Computes the full standalone risk block for a return series.
pub fn compute_risk_metrics(returns: &[Decimal]) -> RiskMetrics {
    RiskMetrics {
        var_95: value_at_risk(returns, VAR_95_CONFIDENCE),
        var_99: value_at_risk(returns, VAR_99_CONFIDENCE),
        expected_shortfall_95: expected_shortfall(returns, VAR_95_CONFIDENCE),
        expected_shortfall_99: expected_shortfall(returns, VAR_99_CONFIDENCE),
        max_drawdown: max_drawdown(returns),
        max_drawdown_duration: max_drawdown_duration(returns),
        volatility: volatility(returns),
        downside_deviation: downside_deviation(returns, Decimal::ZERO),
        skewness: skewness(returns),
        kurtosis: kurtosis(returns),
    }
}

fn annualization_factor() -> Decimal {
    Decimal::from(TRADING_DAYS_PER_YEAR)
        .sqrt()
        .unwrap_or(SQRT_TRADING_DAYS_APPROX)
}

fn growth_factor(r: Decimal) -> Decimal {
    Decimal::ONE + r / HUNDRED
}

fn compounded_growth(returns: &[Decimal]) -> Option<Decimal> {
    returns
        .iter()
        .try_fold(Decimal::ONE, |acc, r| acc.checked_mul(growth_factor(*r)))
}

/// Wealth relative to its running peak after each return, in `[0, 1]`, and
/// whether that day set a strictly higher peak.
fn relative_to_peak(returns: &[Decimal]) -> impl Iterator<Item = (Decimal, bool)> + '_ {
    returns.iter().scan(Decimal::ONE, |ratio, r| {
        let next = (*ratio * growth_factor(*r)).max(Decimal::ZERO);
        let new_peak = next > Decimal::ONE;
        *ratio = if new_peak { Decimal::ONE } else { next };
        Some((*ratio, new_peak))
    })
}

fn sum_of_squared_deviations(values: &[Decimal], center: Decimal) -> Option<Decimal> {
    values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let d = v.checked_sub(center)?;
        acc.checked_add(d.checked_mul(d)?)
    })
}

fn sqrt_or_zero(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value.sqrt().unwrap_or(Decimal::ZERO)
}

fn sorted_ascending(returns: &[Decimal]) -> Vec<Decimal> {
    let mut sorted = returns.to_vec();
    sorted.sort();
    sorted
}

fn tail_index(len: usize, confidence: Decimal) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let raw = (confidence.max(Decimal::ZERO) * Decimal::from(len))
        .floor()
        .to_usize()
        .unwrap_or(0);
    Some(raw.min(len - 1))
}

/// Population central moments `(m2, m3, m4)`, or `None` when a power of a
/// deviation leaves the decimal range.
fn central_moments(values: &[Decimal]) -> Option<(Decimal, Decimal, Decimal)> {
    let n = Decimal::from(values.len());
    let avg = mean(values);
    let (mut s2, mut s3, mut s4) = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    for &v in values {
        let d = v.checked_sub(avg)?;
        let d2 = d.checked_mul(d)?;
        s2 = s2.checked_add(d2)?;
        s3 = s3.checked_add(d2.checked_mul(d)?)?;
        s4 = s4.checked_add(d2.checked_mul(d2)?)?;
    }
    Some((s2 / n, s3 / n, s4 / n))
}
