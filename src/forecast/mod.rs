//! Forecast service.
//!
//! Responsibilities:
//!
//! - fit a model to one category's history and forecast a horizon (`service`)
//! - score a forecast against a withheld tail of the history (`holdout`)

pub mod holdout;
pub mod service;

pub use holdout::*;
pub use service::*;
