//! `sales-forecast` library crate.
//!
//! The binary (`salesfc`) is a thin wrapper around this library so that:
//!
//! - the generator and forecaster are testable without spawning processes
//! - a web or notebook front-end can call `data::generate` and
//!   `forecast::forecast` directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
