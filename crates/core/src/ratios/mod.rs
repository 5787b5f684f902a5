//! Risk-adjusted performance ratios.

mod ratio_calculator;

pub use ratio_calculator::*;
