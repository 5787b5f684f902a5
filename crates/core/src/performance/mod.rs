//! Portfolio performance and risk analysis engine.
//!
//! Pure computations live in `returns`, `statistics`, `ratios` and
//! `benchmark`; this module only fetches data through injected collaborators,
//! hands it to those functions and shapes the result records.

mod performance_model;
mod performance_service;
mod performance_traits;

pub use performance_model::*;
pub use performance_service::*;
pub use performance_traits::*;
