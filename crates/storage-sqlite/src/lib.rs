//! SQLite storage implementation for Perfolio.
//!
//! This crate provides the database-backed collaborators of the analytics
//! engine, using Diesel ORM with SQLite. It implements the provider and store
//! traits defined in `perfolio-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Repository implementations for valuations, benchmarks, risk-free rates
//!   and performance snapshots
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies
//! exist. `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (analytics engine)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! The crate does not run migrations; the tables in [`schema`] are owned by
//! the host application.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod benchmark;
pub mod performance_metrics;
pub mod risk_free;
pub mod valuation;

#[cfg(test)]
pub(crate) mod test_support;


// Re-export database utilities
pub use db::{create_pool, get_connection, spawn_writer, DbConnection, DbPool, WriteHandle};

// Re-export repositories
pub use benchmark::BenchmarkRepository;
pub use performance_metrics::PerformanceMetricsRepository;
pub use risk_free::RiskFreeRateRepository;
pub use valuation::ValuationRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from perfolio-core for convenience
pub use perfolio_core::errors::{DatabaseError, Error, Result};
