//! Risk statistics: volatility, drawdown, tail risk and distribution shape.

mod risk_metrics_model;
mod risk_statistics;

pub use risk_metrics_model::*;
pub use risk_statistics::*;
