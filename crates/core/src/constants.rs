use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Total portfolio account ID
pub const PORTFOLIO_TOTAL_ACCOUNT_ID: &str = "TOTAL";

/// Decimal precision for result records
pub const DECIMAL_PRECISION: u32 = 6;

/// Trading days used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Calendar days used to annualize compounded returns
pub const DAYS_PER_YEAR: u32 = 365;

/// sqrt(252), used when the decimal square root does not converge
pub const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866387544);

/// Minimum aligned observations for a benchmark comparison
pub const MIN_BENCHMARK_OBSERVATIONS: usize = 30;

/// Tail probability for 95% Value-at-Risk
pub const VAR_95_CONFIDENCE: Decimal = dec!(0.05);

/// Tail probability for 99% Value-at-Risk
pub const VAR_99_CONFIDENCE: Decimal = dec!(0.01);

/// Annual risk-free rate (percent) used when no recorded rate covers a date.
///
/// Deployments override it through `AnalyticsConfig::fallback_risk_free_rate`.
pub const DEFAULT_FALLBACK_RISK_FREE_RATE: Decimal = dec!(4.0);

/// Country whose risk-free curve is looked up by default
pub const DEFAULT_RISK_FREE_COUNTRY: &str = "US";
