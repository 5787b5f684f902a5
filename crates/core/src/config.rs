//! Deployment configuration for the analytics engine.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DECIMAL_PRECISION, DEFAULT_FALLBACK_RISK_FREE_RATE, DEFAULT_RISK_FREE_COUNTRY,
    MIN_BENCHMARK_OBSERVATIONS,
};
use crate::errors::{Error, Result};

pub const ENV_FALLBACK_RISK_FREE_RATE: &str = "PERFOLIO_FALLBACK_RISK_FREE_RATE";
pub const ENV_RISK_FREE_COUNTRY: &str = "PERFOLIO_RISK_FREE_COUNTRY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    /// Annual risk-free rate in percent, used when the rate store has no
    /// recorded rate for the calculation date.
    pub fallback_risk_free_rate: Decimal,
    pub risk_free_country: String,
    pub min_benchmark_observations: usize,
    pub decimal_precision: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fallback_risk_free_rate: DEFAULT_FALLBACK_RISK_FREE_RATE,
            risk_free_country: DEFAULT_RISK_FREE_COUNTRY.to_string(),
            min_benchmark_observations: MIN_BENCHMARK_OBSERVATIONS,
            decimal_precision: DECIMAL_PRECISION,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded analytics config from {}", path.display());
        Self::from_json_str(&raw)
    }

    /// Applies `PERFOLIO_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw_rate) = lookup(ENV_FALLBACK_RISK_FREE_RATE) {
            self.fallback_risk_free_rate = Decimal::from_str(raw_rate.trim()).map_err(|e| {
                Error::InvalidConfigValue(format!(
                    "{}='{}': {}",
                    ENV_FALLBACK_RISK_FREE_RATE, raw_rate, e
                ))
            })?;
        }
        if let Some(country) = lookup(ENV_RISK_FREE_COUNTRY) {
            self.risk_free_country = country.trim().to_uppercase();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_benchmark_observations < MIN_BENCHMARK_OBSERVATIONS {
            return Err(Error::InvalidConfigValue(format!(
                "minBenchmarkObservations must be at least {}, got {}",
                MIN_BENCHMARK_OBSERVATIONS, self.min_benchmark_observations
            )));
        }
        if self.risk_free_country.trim().is_empty() {
            return Err(Error::MissingConfigKey("riskFreeCountry".to_string()));
        }
        if self.fallback_risk_free_rate.is_sign_negative() {
            return Err(Error::InvalidConfigValue(format!(
                "fallbackRiskFreeRate must not be negative, got {}",
                self.fallback_risk_free_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.fallback_risk_free_rate, DEFAULT_FALLBACK_RISK_FREE_RATE);
        assert_eq!(config.risk_free_country, "US");
        assert_eq!(config.min_benchmark_observations, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalyticsConfig::from_json_str(r#"{"fallbackRiskFreeRate": 2.5}"#).unwrap();
        assert_eq!(config.fallback_risk_free_rate, dec!(2.5));
        assert_eq!(config.risk_free_country, "US");
        assert_eq!(config.decimal_precision, DECIMAL_PRECISION);
    }

    #[test]
    fn test_rejects_gate_below_minimum() {
        let result = AnalyticsConfig::from_json_str(r#"{"minBenchmarkObservations": 10}"#);
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = AnalyticsConfig::from_json_str("{not json");
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"riskFreeCountry": "DE", "minBenchmarkObservations": 60}}"#).unwrap();

        let config = AnalyticsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.risk_free_country, "DE");
        assert_eq!(config.min_benchmark_observations, 60);
    }

    #[test]
    fn test_missing_file_is_config_io() {
        let result = AnalyticsConfig::from_file("/nonexistent/perfolio/config.json");
        assert!(matches!(result, Err(Error::ConfigIO(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_FALLBACK_RISK_FREE_RATE, "1.75"),
            (ENV_RISK_FREE_COUNTRY, " gb "),
        ]);
        let config = AnalyticsConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.fallback_risk_free_rate, dec!(1.75));
        assert_eq!(config.risk_free_country, "GB");
    }

    #[test]
    fn test_env_override_rejects_garbage_rate() {
        let result = AnalyticsConfig::default().with_overrides_from(|key| {
            (key == ENV_FALLBACK_RISK_FREE_RATE).then(|| "four percent".to_string())
        });
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
    }
}
