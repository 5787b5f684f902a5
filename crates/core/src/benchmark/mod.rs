//! Benchmark-relative metrics between two aligned return series.

mod benchmark_comparator;
mod benchmark_model;

pub use benchmark_comparator::*;
pub use benchmark_model::*;
