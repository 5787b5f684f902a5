use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a resolved risk-free rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    Recorded,
    Fallback,
}

/// A rate as stored by the rate store. Rates are in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRiskFreeRate {
    pub country_code: String,
    pub recorded_date: NaiveDate,
    pub annual_rate: Decimal,
    pub daily_rate: Option<Decimal>,
}

/// The rate applied to one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFreeRate {
    pub date: NaiveDate,
    pub annual_rate: Decimal,
    pub daily_rate: Decimal,
    pub source: RateSource,
}
