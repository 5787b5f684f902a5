//! SQLite storage implementation for benchmarks and their prices.

mod model;
mod repository;

pub use model::{BenchmarkDB, BenchmarkPriceDB};
pub use repository::BenchmarkRepository;

// Re-export trait from core for convenience
pub use perfolio_core::performance::BenchmarkPriceProviderTrait;
