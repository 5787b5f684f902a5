use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::RiskFreeRateDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::risk_free_rates;
use perfolio_core::errors::Result;
use perfolio_core::risk_free::{RecordedRiskFreeRate, RiskFreeRateStoreTrait};

pub struct RiskFreeRateRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl RiskFreeRateRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Records a rate; a second rate for the same country and date replaces
    /// the first.
    pub async fn save_rate(&self, rate: &RecordedRiskFreeRate) -> Result<()> {
        let record = RiskFreeRateDB::from(rate);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(risk_free_rates::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl RiskFreeRateStoreTrait for RiskFreeRateRepository {
    async fn lookup(
        &self,
        date: NaiveDate,
        country: &str,
    ) -> Result<Option<RecordedRiskFreeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let row = risk_free_rates::table
            .filter(risk_free_rates::country_code.eq(country))
            .filter(risk_free_rates::recorded_date.le(date))
            .order(risk_free_rates::recorded_date.desc())
            .select(RiskFreeRateDB::as_select())
            .first::<RiskFreeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(RecordedRiskFreeRate::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;
    use rust_decimal_macros::dec;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn rate(country: &str, recorded: NaiveDate, annual: rust_decimal::Decimal) -> RecordedRiskFreeRate {
        RecordedRiskFreeRate {
            country_code: country.to_string(),
            recorded_date: recorded,
            annual_rate: annual,
            daily_rate: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_returns_most_recent_rate_on_or_before_date() {
        let (pool, writer, _temp_dir) = create_test_database();
        let repo = RiskFreeRateRepository::new(Arc::clone(&pool), writer);
        repo.save_rate(&rate("US", date(1, 2), dec!(5.1))).await.unwrap();
        repo.save_rate(&rate("US", date(3, 1), dec!(5.3))).await.unwrap();
        repo.save_rate(&rate("CA", date(2, 15), dec!(4.9))).await.unwrap();

        let found = repo.lookup(date(2, 20), "US").await.unwrap().unwrap();
        assert_eq!(found.recorded_date, date(1, 2));
        assert_eq!(found.annual_rate, dec!(5.1));

        let exact = repo.lookup(date(3, 1), "US").await.unwrap().unwrap();
        assert_eq!(exact.annual_rate, dec!(5.3));

        assert_eq!(repo.lookup(date(1, 1), "US").await.unwrap(), None);
        assert_eq!(repo.lookup(date(2, 20), "GB").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_rate_replaces_same_day() {
        let (pool, writer, _temp_dir) = create_test_database();
        let repo = RiskFreeRateRepository::new(Arc::clone(&pool), writer);
        repo.save_rate(&rate("US", date(1, 2), dec!(5.1))).await.unwrap();
        repo.save_rate(&RecordedRiskFreeRate {
            daily_rate: Some(dec!(0.02)),
            ..rate("US", date(1, 2), dec!(5.04))
        })
        .await
        .unwrap();

        let found = repo.lookup(date(1, 2), "US").await.unwrap().unwrap();
        assert_eq!(found.annual_rate, dec!(5.04));
        assert_eq!(found.daily_rate, Some(dec!(0.02)));
    }
}
