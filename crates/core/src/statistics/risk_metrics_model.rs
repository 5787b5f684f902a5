use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Standalone risk profile of a return series.
///
/// VaR, expected shortfall, drawdown, volatility and downside deviation are in
/// percent; skewness and excess kurtosis are unitless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub var_95: Decimal,
    pub var_99: Decimal,
    pub expected_shortfall_95: Decimal,
    pub expected_shortfall_99: Decimal,
    pub max_drawdown: Decimal,
    pub max_drawdown_duration: u32,
    pub volatility: Decimal,
    pub downside_deviation: Decimal,
    pub skewness: Decimal,
    pub kurtosis: Decimal,
}

impl RiskMetrics {
    pub fn round_dp(self, dp: u32) -> Self {
        Self {
            var_95: self.var_95.round_dp(dp),
            var_99: self.var_99.round_dp(dp),
            expected_shortfall_95: self.expected_shortfall_95.round_dp(dp),
            expected_shortfall_99: self.expected_shortfall_99.round_dp(dp),
            max_drawdown: self.max_drawdown.round_dp(dp),
            max_drawdown_duration: self.max_drawdown_duration,
            volatility: self.volatility.round_dp(dp),
            downside_deviation: self.downside_deviation.round_dp(dp),
            skewness: self.skewness.round_dp(dp),
            kurtosis: self.kurtosis.round_dp(dp),
        }
    }
}
