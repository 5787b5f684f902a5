//! Database models for benchmarks and benchmark closes.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{parse_decimal, parse_timestamp};
use perfolio_core::errors::{Error, Result};
use perfolio_core::performance::{BenchmarkInfo, BenchmarkPrice};

#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    AsChangeset,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::benchmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkDB {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Closing price of a benchmark. `timestamp` is RFC 3339 in UTC, which keeps
/// lexical and chronological order identical.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::benchmark_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BenchmarkPriceDB {
    pub id: String,
    pub benchmark_id: String,
    pub timestamp: String,
    pub close_price: String,
}

impl BenchmarkPriceDB {
    pub fn from_price(benchmark_id: &str, price: &BenchmarkPrice) -> Self {
        let timestamp = price.timestamp.to_rfc3339();
        Self {
            id: format!("{}_{}", benchmark_id, timestamp),
            benchmark_id: benchmark_id.to_string(),
            timestamp,
            close_price: price.close_price.to_string(),
        }
    }
}

impl From<BenchmarkDB> for BenchmarkInfo {
    fn from(db: BenchmarkDB) -> Self {
        BenchmarkInfo {
            id: db.id,
            symbol: db.symbol,
            name: db.name,
        }
    }
}

impl From<&BenchmarkInfo> for BenchmarkDB {
    fn from(info: &BenchmarkInfo) -> Self {
        BenchmarkDB {
            id: info.id.clone(),
            symbol: info.symbol.clone(),
            name: info.name.clone(),
        }
    }
}

impl TryFrom<BenchmarkPriceDB> for BenchmarkPrice {
    type Error = Error;

    fn try_from(db: BenchmarkPriceDB) -> Result<Self> {
        Ok(BenchmarkPrice {
            timestamp: parse_timestamp("benchmark_prices.timestamp", &db.timestamp)?,
            close_price: parse_decimal("benchmark_prices.close_price", &db.close_price)?,
        })
    }
}
