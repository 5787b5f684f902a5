//! SQLite storage implementation for recorded risk-free rates.

mod model;
mod repository;

pub use model::RiskFreeRateDB;
pub use repository::RiskFreeRateRepository;

// Re-export trait from core for convenience
pub use perfolio_core::risk_free::RiskFreeRateStoreTrait;
