//! Temporary databases for repository tests.
//!
//! The host application owns the schema, so tests create the tables they
//! touch from the DDL below.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, spawn_writer, DbPool, WriteHandle};

const TEST_SCHEMA: &str = "
    CREATE TABLE daily_account_valuation (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        valuation_date DATE NOT NULL,
        total_value TEXT NOT NULL,
        calculated_at TEXT NOT NULL
    );
    CREATE TABLE benchmarks (
        id TEXT PRIMARY KEY NOT NULL,
        symbol TEXT NOT NULL,
        name TEXT NOT NULL
    );
    CREATE TABLE benchmark_prices (
        id TEXT PRIMARY KEY NOT NULL,
        benchmark_id TEXT NOT NULL REFERENCES benchmarks(id),
        timestamp TEXT NOT NULL,
        close_price TEXT NOT NULL
    );
    CREATE TABLE risk_free_rates (
        id TEXT PRIMARY KEY NOT NULL,
        country_code TEXT NOT NULL,
        recorded_date DATE NOT NULL,
        annual_rate TEXT NOT NULL,
        daily_rate TEXT
    );
    CREATE TABLE performance_metrics (
        id TEXT PRIMARY KEY NOT NULL,
        calculation_date DATE NOT NULL,
        benchmark_id TEXT,
        period_days BIGINT NOT NULL,
        portfolio_return TEXT NOT NULL,
        annualized_return TEXT NOT NULL,
        benchmark_return TEXT,
        excess_return TEXT,
        volatility TEXT NOT NULL,
        sharpe_ratio TEXT NOT NULL,
        sortino_ratio TEXT NOT NULL,
        calmar_ratio TEXT NOT NULL,
        tracking_error TEXT,
        max_drawdown TEXT NOT NULL,
        var_95 TEXT NOT NULL,
        var_99 TEXT NOT NULL,
        risk_free_rate TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// A pool and writer over a fresh database. Keep the `TempDir` alive for the
/// duration of the test.
pub(crate) fn create_test_database() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let db_path_str = db_path.to_string_lossy().to_string();

    let pool = create_pool(&db_path_str).expect("Failed to create pool");
    get_connection(&pool)
        .expect("Failed to get connection")
        .batch_execute(TEST_SCHEMA)
        .expect("Failed to create test schema");

    let writer = spawn_writer((*pool).clone());
    (pool, writer, temp_dir)
}

/// Runs raw SQL against the test database, for seeding rows the
/// repositories would refuse to write.
pub(crate) fn execute_sql(pool: &DbPool, sql: &str) {
    get_connection(pool)
        .expect("Failed to get connection")
        .batch_execute(sql)
        .expect("Failed to execute test SQL");
}
