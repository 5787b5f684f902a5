//! Return series construction.
//!
//! Turns raw valuation/price histories into daily percentage returns and
//! aligns two series on their common dates.

mod return_series;
mod returns_model;

pub use return_series::*;
pub use returns_model::*;
