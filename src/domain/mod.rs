//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - generation inputs (`GenerationConfig`, `SeasonalityMode`, `EventDate`)
//! - the series representation (`TimeSeriesPoint`, `SeriesStats`)
//! - forecast inputs and outputs (`ForecastConfig`, `ForecastResult`, etc.)

pub mod types;

pub use types::*;
