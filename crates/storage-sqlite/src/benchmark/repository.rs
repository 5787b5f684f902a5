use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{BenchmarkDB, BenchmarkPriceDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{benchmark_prices, benchmarks};
use perfolio_core::errors::Result;
use perfolio_core::performance::{BenchmarkInfo, BenchmarkPrice, BenchmarkPriceProviderTrait};

pub struct BenchmarkRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BenchmarkRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    pub async fn save_benchmark(&self, info: &BenchmarkInfo) -> Result<()> {
        let record = BenchmarkDB::from(info);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(benchmarks::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    pub async fn save_prices(&self, benchmark_id: &str, prices: &[BenchmarkPrice]) -> Result<()> {
        if prices.is_empty() {
            return Ok(());
        }

        let records_to_save: Vec<BenchmarkPriceDB> = prices
            .iter()
            .map(|p| BenchmarkPriceDB::from_price(benchmark_id, p))
            .collect();

        self.writer
            .exec(move |conn| {
                for chunk in records_to_save.chunks(1000) {
                    diesel::replace_into(benchmark_prices::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl BenchmarkPriceProviderTrait for BenchmarkRepository {
    async fn get_range(
        &self,
        benchmark_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BenchmarkPrice>> {
        let mut conn = get_connection(&self.pool)?;

        // Day bounds as text prefixes of the stored RFC 3339 timestamps.
        let lower = start.format("%Y-%m-%d").to_string();
        let upper = (end + Duration::days(1)).format("%Y-%m-%d").to_string();

        let rows = benchmark_prices::table
            .filter(benchmark_prices::benchmark_id.eq(benchmark_id))
            .filter(benchmark_prices::timestamp.ge(lower))
            .filter(benchmark_prices::timestamp.lt(upper))
            .order(benchmark_prices::timestamp.asc())
            .select(BenchmarkPriceDB::as_select())
            .load::<BenchmarkPriceDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(BenchmarkPrice::try_from).collect()
    }

    async fn get_info(&self, benchmark_id: &str) -> Result<Option<BenchmarkInfo>> {
        let mut conn = get_connection(&self.pool)?;

        let row = benchmarks::table
            .find(benchmark_id)
            .select(BenchmarkDB::as_select())
            .first::<BenchmarkDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(BenchmarkInfo::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_database, execute_sql};
    use chrono::{TimeZone, Utc};
    use perfolio_core::errors::{DatabaseError, Error};
    use rust_decimal_macros::dec;

    fn spy() -> BenchmarkInfo {
        BenchmarkInfo {
            id: "SPY".to_string(),
            symbol: "SPY".to_string(),
            name: "SPDR S&P 500 ETF".to_string(),
        }
    }

    fn close(day: u32, hour: u32, price: rust_decimal::Decimal) -> BenchmarkPrice {
        BenchmarkPrice {
            timestamp: Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap(),
            close_price: price,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[tokio::test]
    async fn test_get_info() {
        let (pool, writer, _temp_dir) = create_test_database();
        let repo = BenchmarkRepository::new(Arc::clone(&pool), writer);

        assert_eq!(repo.get_info("SPY").await.unwrap(), None);

        repo.save_benchmark(&spy()).await.unwrap();

        assert_eq!(repo.get_info("SPY").await.unwrap(), Some(spy()));
    }

    #[tokio::test]
    async fn test_get_range_includes_whole_end_day() {
        let (pool, writer, _temp_dir) = create_test_database();
        let repo = BenchmarkRepository::new(Arc::clone(&pool), writer);
        repo.save_benchmark(&spy()).await.unwrap();
        repo.save_prices(
            "SPY",
            &[
                close(3, 20, dec!(512.5)),
                close(1, 20, dec!(500)),
                close(2, 20, dec!(505)),
                close(4, 20, dec!(515)),
            ],
        )
        .await
        .unwrap();

        let prices = repo.get_range("SPY", date(2), date(3)).await.unwrap();

        assert_eq!(prices, vec![close(2, 20, dec!(505)), close(3, 20, dec!(512.5))]);
        assert!(repo.get_range("QQQ", date(1), date(4)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_price_is_reported() {
        let (pool, writer, _temp_dir) = create_test_database();
        let repo = BenchmarkRepository::new(Arc::clone(&pool), writer);
        repo.save_benchmark(&spy()).await.unwrap();
        execute_sql(
            &pool,
            "INSERT INTO benchmark_prices VALUES \
             ('SPY_bad', 'SPY', '2024-05-01T20:00:00+00:00', '')",
        );

        let err = repo.get_range("SPY", date(1), date(1)).await.unwrap_err();

        assert!(matches!(err, Error::Database(DatabaseError::CorruptValue(_))));
    }
}
