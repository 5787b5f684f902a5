//! Perfolio Core - Portfolio performance and risk analytics.
//!
//! This crate contains the analytics engine: return series construction,
//! risk statistics, risk-adjusted ratios, benchmark comparison and
//! risk-free rate resolution. It is database-agnostic and defines the
//! collaborator traits that are implemented by the `storage-sqlite` crate.

pub mod benchmark;
pub mod config;
pub mod constants;
pub mod errors;
pub mod performance;
pub mod ratios;
pub mod returns;
pub mod risk_free;
pub mod statistics;

// Re-export the engine surface
pub use config::AnalyticsConfig;
pub use performance::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
