use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annualized inputs the comparison needs besides the two return series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonInputs {
    pub portfolio_annualized_return: Decimal,
    pub benchmark_annualized_return: Decimal,
    pub risk_free_rate: Decimal,
}

/// Relative-performance block of a benchmark comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    /// Portfolio minus benchmark annualized return, in percent.
    pub excess_return: Decimal,
    pub tracking_error: Decimal,
    pub information_ratio: Decimal,
    pub beta: Decimal,
    pub alpha: Decimal,
    pub r_squared: Decimal,
    pub correlation: Decimal,
}

impl ComparisonMetrics {
    pub fn round_dp(self, dp: u32) -> Self {
        Self {
            excess_return: self.excess_return.round_dp(dp),
            tracking_error: self.tracking_error.round_dp(dp),
            information_ratio: self.information_ratio.round_dp(dp),
            beta: self.beta.round_dp(dp),
            alpha: self.alpha.round_dp(dp),
            r_squared: self.r_squared.round_dp(dp),
            correlation: self.correlation.round_dp(dp),
        }
    }
}
