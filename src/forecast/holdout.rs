//! Holdout evaluation: refit on a truncated history and score the forecast
//! against the withheld tail.

use log::debug;

use crate::domain::{ForecastConfig, ForecastMetrics, TimeSeriesPoint};
use crate::error::AppError;
use crate::forecast::service::{forecast, prepare_history, validate_config};
use crate::math::{mae, mse};

/// Score a `config.horizon`-day forecast against the last `config.horizon` points.
pub fn evaluate_holdout(history: &[TimeSeriesPoint], config: &ForecastConfig) -> Result<ForecastMetrics, AppError> {
    validate_config(config)?;
    let (category, series) = prepare_history(history)?;

    let holdout = config.horizon;
    let required = config.min_history() + holdout;
    if series.len() < required {
        return Err(AppError::insufficient_data(format!(
            "Holdout of {holdout} days needs at least {required} days of history; '{category}' has {}.",
            series.len()
        )));
    }

    let split = series.len() - holdout;
    let train_config = ForecastConfig {
        confidence_level: None,
        ..*config
    };
    let result = forecast(&series[..split], &train_config)?;
    let actual: Vec<f64> = series[split..].iter().map(|p| p.value).collect();

    let mae = mae(&actual, &result.predicted_values)
        .ok_or_else(|| AppError::model_fit("Holdout length mismatch."))?;
    let mse = mse(&actual, &result.predicted_values)
        .ok_or_else(|| AppError::model_fit("Holdout length mismatch."))?;
    debug!("Holdout '{category}' ({holdout} days): MAE={mae:.3}, MSE={mse:.3}");

    Ok(ForecastMetrics { holdout, mae, mse })
}
