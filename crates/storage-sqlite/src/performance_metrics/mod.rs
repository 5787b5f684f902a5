//! SQLite storage implementation for computed performance snapshots.

mod model;
mod repository;

pub use model::PerformanceMetricsDB;
pub use repository::PerformanceMetricsRepository;

// Re-export trait from core for convenience
pub use perfolio_core::performance::PerformanceMetricsStoreTrait;
