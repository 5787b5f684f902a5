//! SQLite storage implementation for portfolio valuation history.

mod model;
mod repository;

pub use model::DailyValuationDB;
pub use repository::ValuationRepository;

// Re-export trait from core for convenience
pub use perfolio_core::performance::PortfolioValuationProviderTrait;
