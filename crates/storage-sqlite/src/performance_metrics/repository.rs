use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{metrics_row_id, PerformanceMetricsDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::performance_metrics;
use perfolio_core::errors::Result;
use perfolio_core::performance::{PerformanceMetrics, PerformanceMetricsStoreTrait};

pub struct PerformanceMetricsRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PerformanceMetricsRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    pub fn get_metrics(
        &self,
        calculation_date: NaiveDate,
        benchmark_id: Option<&str>,
    ) -> Result<Option<PerformanceMetrics>> {
        let mut conn = get_connection(&self.pool)?;

        let row = performance_metrics::table
            .find(metrics_row_id(calculation_date, benchmark_id))
            .select(PerformanceMetricsDB::as_select())
            .first::<PerformanceMetricsDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(PerformanceMetrics::try_from).transpose()
    }

    /// Snapshots whose calculation date falls in `[start, end]`, oldest first.
    pub fn list_metrics(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PerformanceMetrics>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = performance_metrics::table
            .filter(performance_metrics::calculation_date.ge(start))
            .filter(performance_metrics::calculation_date.le(end))
            .order((
                performance_metrics::calculation_date.asc(),
                performance_metrics::id.asc(),
            ))
            .select(PerformanceMetricsDB::as_select())
            .load::<PerformanceMetricsDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(PerformanceMetrics::try_from).collect()
    }
}

#[async_trait]
impl PerformanceMetricsStoreTrait for PerformanceMetricsRepository {
    async fn upsert(&self, metrics: &PerformanceMetrics) -> Result<()> {
        let record = PerformanceMetricsDB::from_metrics(metrics, &Utc::now().to_rfc3339());
        debug!("Upserting performance metrics row {}", record.id);

        self.writer
            .exec(move |conn| {
                diesel::replace_into(performance_metrics::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
