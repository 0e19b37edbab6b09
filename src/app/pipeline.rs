//! Shared "generate" and "forecast" workflows.
//!
//! Keeping these in one place lets the CLI focus on presentation and lets the
//! integration tests drive the same code paths without spawning processes.

use std::path::Path;

use log::warn;

use crate::domain::{ForecastConfig, ForecastMetrics, ForecastResult, GenerationConfig, SeriesStats};
use crate::error::AppError;
use crate::forecast::{categories, evaluate_holdout, forecast, series_for_category};
use crate::io::{LoadedSeries, read_series_csv, write_series_csv};

/// Outputs of a single `salesfc generate` run.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub rows: usize,
    pub stats: Vec<SeriesStats>,
}

/// Outputs of a single `salesfc forecast` run.
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub loaded: LoadedSeries,
    pub result: ForecastResult,
    pub metrics: Option<ForecastMetrics>,
}

/// Generate a dataset and write it to `output`.
pub fn run_generate(config: &GenerationConfig, output: &Path) -> Result<GenerateOutput, AppError> {
    let points = crate::data::generate(config)?;
    write_series_csv(output, &points)?;

    Ok(GenerateOutput {
        rows: points.len(),
        stats: crate::report::series_stats(&points),
    })
}

/// Load a dataset, forecast one category and optionally score a holdout.
///
/// A failed holdout never discards the forecast; the metrics are simply omitted.
pub fn run_forecast(
    input: &Path,
    category: Option<&str>,
    config: &ForecastConfig,
    with_metrics: bool,
) -> Result<ForecastOutput, AppError> {
    let loaded = read_series_csv(input)?;

    let category = match category {
        Some(c) => c.to_string(),
        None => categories(&loaded.points)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::insufficient_data(format!("No rows in '{}'.", input.display())))?,
    };
    let history = series_for_category(&loaded.points, &category)?;
    let result = forecast(&history, config)?;

    let metrics = if with_metrics {
        holdout_or_skip(evaluate_holdout(&history, config), &category)
    } else {
        None
    };

    Ok(ForecastOutput {
        loaded,
        result,
        metrics,
    })
}

/// Holdout metrics are optional output: any failure is logged and dropped.
fn holdout_or_skip(holdout: Result<ForecastMetrics, AppError>, category: &str) -> Option<ForecastMetrics> {
    match holdout {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("Skipping holdout metrics for '{category}' ({:?}): {e}", e.kind());
            None
        }
    }
}
