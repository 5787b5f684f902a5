use chrono::NaiveDate;
use diesel::prelude::*;

use crate::utils::{parse_decimal, parse_optional_decimal};
use perfolio_core::errors::{Error, Result};
use perfolio_core::risk_free::RecordedRiskFreeRate;

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::risk_free_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RiskFreeRateDB {
    pub id: String,
    pub country_code: String,
    pub recorded_date: NaiveDate,
    pub annual_rate: String,
    pub daily_rate: Option<String>,
}

impl From<&RecordedRiskFreeRate> for RiskFreeRateDB {
    fn from(rate: &RecordedRiskFreeRate) -> Self {
        RiskFreeRateDB {
            id: format!(
                "{}_{}",
                rate.country_code,
                rate.recorded_date.format("%Y-%m-%d")
            ),
            country_code: rate.country_code.clone(),
            recorded_date: rate.recorded_date,
            annual_rate: rate.annual_rate.to_string(),
            daily_rate: rate.daily_rate.map(|d| d.to_string()),
        }
    }
}

impl TryFrom<RiskFreeRateDB> for RecordedRiskFreeRate {
    type Error = Error;

    fn try_from(db: RiskFreeRateDB) -> Result<Self> {
        Ok(RecordedRiskFreeRate {
            annual_rate: parse_decimal("risk_free_rates.annual_rate", &db.annual_rate)?,
            daily_rate: parse_optional_decimal(
                "risk_free_rates.daily_rate",
                db.daily_rate.as_deref(),
            )?,
            country_code: db.country_code,
            recorded_date: db.recorded_date,
        })
    }
}
