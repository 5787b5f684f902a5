use async_trait::async_trait;
use chrono::NaiveDate;

use super::RecordedRiskFreeRate;
use crate::errors::Result;

/// Read access to recorded risk-free rates.
#[async_trait]
pub trait RiskFreeRateStoreTrait: Send + Sync {
    /// Most recent rate for `country_code` with `recorded_date <= date`.
    async fn lookup(
        &self,
        date: NaiveDate,
        country_code: &str,
    ) -> Result<Option<RecordedRiskFreeRate>>;
}
