use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::{RateSource, RecordedRiskFreeRate, RiskFreeRate, RiskFreeRateStoreTrait};
use crate::constants::TRADING_DAYS_PER_YEAR;

/// Resolves the risk-free rate applicable to a calculation date.
///
/// Never fails: an empty store, a store error, or a date before the first
/// recorded rate all resolve to the configured fallback.
#[derive(Clone)]
pub struct RiskFreeRateProvider {
    store: Arc<dyn RiskFreeRateStoreTrait>,
    fallback_annual_rate: Decimal,
}

impl RiskFreeRateProvider {
    pub fn new(store: Arc<dyn RiskFreeRateStoreTrait>, fallback_annual_rate: Decimal) -> Self {
        Self {
            store,
            fallback_annual_rate,
        }
    }

    pub fn fallback_annual_rate(&self) -> Decimal {
        self.fallback_annual_rate
    }

    pub async fn resolve(&self, date: NaiveDate, country_code: &str) -> RiskFreeRate {
        match self.store.lookup(date, country_code).await {
            Ok(Some(recorded)) if recorded.recorded_date <= date => {
                debug!(
                    "Using {} risk-free rate {}% recorded on {} for {}",
                    country_code, recorded.annual_rate, recorded.recorded_date, date
                );
                Self::from_recorded(date, &recorded)
            }
            Ok(Some(recorded)) => {
                warn!(
                    "Rate store returned a {} rate recorded on {}, after the requested {}; using fallback {}%",
                    country_code, recorded.recorded_date, date, self.fallback_annual_rate
                );
                self.fallback(date)
            }
            Ok(None) => {
                warn!(
                    "No {} risk-free rate recorded on or before {}; using fallback {}%",
                    country_code, date, self.fallback_annual_rate
                );
                self.fallback(date)
            }
            Err(e) => {
                warn!(
                    "Risk-free rate lookup for {} on {} failed: {}; using fallback {}%",
                    country_code, date, e, self.fallback_annual_rate
                );
                self.fallback(date)
            }
        }
    }

    fn from_recorded(date: NaiveDate, recorded: &RecordedRiskFreeRate) -> RiskFreeRate {
        RiskFreeRate {
            date,
            annual_rate: recorded.annual_rate,
            daily_rate: recorded
                .daily_rate
                .unwrap_or_else(|| daily_from_annual(recorded.annual_rate)),
            source: RateSource::Recorded,
        }
    }

    fn fallback(&self, date: NaiveDate) -> RiskFreeRate {
        RiskFreeRate {
            date,
            annual_rate: self.fallback_annual_rate,
            daily_rate: daily_from_annual(self.fallback_annual_rate),
            source: RateSource::Fallback,
        }
    }
}

/// Spreads an annual percentage rate over the trading year.
pub fn daily_from_annual(annual_rate: Decimal) -> Decimal {
    annual_rate / Decimal::from(TRADING_DAYS_PER_YEAR)
}
