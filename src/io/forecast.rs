//! Read/write forecast JSON files.
//!
//! A forecast file is the portable representation of one forecast run:
//! - the category, forecast dates, point forecasts and bounds
//! - the fitted model parameters
//! - optional holdout metrics
//!
//! The schema is defined by `domain::ForecastFile`.

use std::fs::{File, create_dir_all};
use std::path::Path;

use log::info;

use crate::domain::{ForecastFile, ForecastMetrics, ForecastResult};
use crate::error::AppError;

/// Write a forecast JSON file.
pub fn write_forecast_json(
    path: &Path,
    result: &ForecastResult,
    metrics: Option<&ForecastMetrics>,
    source: Option<&Path>,
) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create forecast JSON '{}': {e}", path.display())))?;

    let payload = ForecastFile {
        tool: env!("CARGO_PKG_NAME").to_string(),
        source: source.map(|p| p.display().to_string()),
        forecast: result.clone(),
        metrics: metrics.copied(),
    };

    serde_json::to_writer_pretty(file, &payload)
        .map_err(|e| AppError::io(format!("Failed to write forecast JSON: {e}")))?;

    info!("Wrote forecast for '{}' to {}", result.category, path.display());
    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open forecast JSON '{}': {e}", path.display())))?;
    let payload: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid_config(format!("Invalid forecast JSON: {e}")))?;
    Ok(payload)
}
