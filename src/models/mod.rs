//! Forecasting model implementations.
//!
//! Models are implemented as small, pure functions so that the forecast service
//! can stay focused on validation and packaging results.

pub mod arima;

pub use arima::*;
