use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::DailyValuationDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::daily_account_valuation;
use perfolio_core::constants::PORTFOLIO_TOTAL_ACCOUNT_ID;
use perfolio_core::errors::Result;
use perfolio_core::performance::{PortfolioValuationProviderTrait, ValuationPoint};

/// Reads the aggregate (`TOTAL`) valuation history of the portfolio.
pub struct ValuationRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
    portfolio_account_id: String,
}

impl ValuationRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self::for_account(pool, writer, PORTFOLIO_TOTAL_ACCOUNT_ID)
    }

    /// Repository reading the valuation rows of a single account instead of
    /// the portfolio aggregate.
    pub fn for_account(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
        portfolio_account_id: &str,
    ) -> Self {
        Self {
            pool,
            writer,
            portfolio_account_id: portfolio_account_id.to_string(),
        }
    }

    pub async fn save_valuations(&self, points: &[ValuationPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let records_to_save: Vec<DailyValuationDB> = points
            .iter()
            .map(|p| DailyValuationDB::from_point(&self.portfolio_account_id, p, &now))
            .collect();

        self.writer
            .exec(move |conn| {
                for chunk in records_to_save.chunks(1000) {
                    diesel::replace_into(daily_account_valuation::table)
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
impl PortfolioValuationProviderTrait for ValuationRepository {
    async fn get_historical_values(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ValuationPoint>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = daily_account_valuation::table
            .filter(daily_account_valuation::account_id.eq(&self.portfolio_account_id))
            .filter(daily_account_valuation::valuation_date.ge(start))
            .filter(daily_account_valuation::valuation_date.le(end))
            .order(daily_account_valuation::valuation_date.asc())
            .select(DailyValuationDB::as_select())
            .load::<DailyValuationDB>(&mut conn)
            .map_err(StorageError::from)?;

        debug!(
            "Loaded {} valuations for {} between {} and {}",
            rows.len(),
            self.portfolio_account_id,
            start,
            end
        );

        rows.into_iter().map(ValuationPoint::try_from).collect()
    }
}
