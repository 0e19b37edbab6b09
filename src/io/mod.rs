//! File I/O: series CSV and forecast JSON.

pub mod forecast;
pub mod series;

pub use forecast::*;
pub use series::*;
