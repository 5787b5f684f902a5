//! Risk-free rate resolution with a configurable fallback.

mod risk_free_model;
mod risk_free_service;
mod risk_free_traits;

pub use risk_free_model::*;
pub use risk_free_service::*;
pub use risk_free_traits::*;
