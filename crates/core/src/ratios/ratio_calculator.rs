//! Sharpe, Sortino and Calmar ratios.
//!
//! Inputs are annualized percentages. A zero denominator, or a quotient
//! outside the decimal range, yields `0` so that result records always carry
//! a number.

use rust_decimal::Decimal;

/// `(annualized_return - risk_free_rate) / volatility`.
pub fn sharpe_ratio(
    annualized_return: Decimal,
    volatility: Decimal,
    risk_free_rate: Decimal,
) -> Decimal {
    ratio_or_zero(annualized_return.saturating_sub(risk_free_rate), volatility)
}

/// `(annualized_return - risk_free_rate) / downside_deviation`.
pub fn sortino_ratio(
    annualized_return: Decimal,
    downside_deviation: Decimal,
    risk_free_rate: Decimal,
) -> Decimal {
    ratio_or_zero(annualized_return.saturating_sub(risk_free_rate), downside_deviation)
}

/// `annualized_return / |max_drawdown|`.
pub fn calmar_ratio(annualized_return: Decimal, max_drawdown: Decimal) -> Decimal {
    ratio_or_zero(annualized_return, max_drawdown.abs())
}

fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}
