//! Single-shot fit-and-predict for one category's history.
//!
//! Responsibilities:
//!
//! - validate the request (`ForecastConfig`) and the history
//! - fit ARIMA(p, d, 0) to the history values
//! - package point forecasts, forecast dates and optional bounds

use chrono::{Days, NaiveDate};
use log::{info, warn};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::domain::{
    ConfidenceBounds, ForecastConfig, ForecastResult, MAX_AR_ORDER, MAX_DIFFERENCING, MAX_HORIZON, ModelSummary,
    TimeSeriesPoint,
};
use crate::error::AppError;
use crate::models::{ArimaFit, fit_arima};

/// Fit a model to `history` and forecast `config.horizon` days ahead.
///
/// `history` must hold a single category; it is sorted by date before fitting.
pub fn forecast(history: &[TimeSeriesPoint], config: &ForecastConfig) -> Result<ForecastResult, AppError> {
    validate_config(config)?;
    let (category, series) = prepare_history(history)?;

    let min_history = config.min_history();
    if series.len() < min_history {
        return Err(AppError::insufficient_data(format!(
            "{} needs at least {min_history} days of history; '{category}' has {}.",
            config.model_label(),
            series.len()
        )));
    }

    let last_date = series[series.len() - 1].date;
    let dates = forecast_dates(last_date, config.horizon)?;

    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let fit = fit_arima(&values, config.ar_order, config.differencing)?;

    let predicted_values = fit.forecast(config.horizon);
    if predicted_values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::model_fit("Non-finite forecast values."));
    }

    let confidence_bounds = match config.confidence_level {
        Some(level) => Some(confidence_bounds(&fit, &predicted_values, level)?),
        None => None,
    };

    info!(
        "Forecast '{category}': {} on {} days, horizon {} ({}..{})",
        config.model_label(),
        series.len(),
        config.horizon,
        dates[0],
        dates[dates.len() - 1]
    );

    Ok(ForecastResult {
        category,
        horizon: config.horizon,
        dates,
        predicted_values,
        confidence_bounds,
        model: ModelSummary {
            label: config.model_label(),
            ar_order: fit.ar_order,
            differencing: fit.differencing,
            intercept: fit.intercept,
            coefficients: fit.coefficients.clone(),
            sigma2: fit.sigma2,
            n_obs: fit.n_obs,
        },
    })
}

/// Extract one category's points from a multi-category dataset.
pub fn series_for_category(points: &[TimeSeriesPoint], category: &str) -> Result<Vec<TimeSeriesPoint>, AppError> {
    let series: Vec<TimeSeriesPoint> = points
        .iter()
        .filter(|p| p.category == category)
        .cloned()
        .collect();
    if series.is_empty() {
        return Err(AppError::invalid_config(format!(
            "Unknown category '{category}' (available: {}).",
            categories(points).join(", ")
        )));
    }
    Ok(series)
}

/// Distinct categories in first-seen order.
pub fn categories(points: &[TimeSeriesPoint]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in points {
        if !out.iter().any(|c| c == &p.category) {
            out.push(p.category.clone());
        }
    }
    out
}

pub(crate) fn validate_config(config: &ForecastConfig) -> Result<(), AppError> {
    if config.horizon == 0 {
        return Err(AppError::invalid_config("Forecast horizon must be > 0."));
    }
    if config.horizon > MAX_HORIZON {
        return Err(AppError::invalid_config(format!(
            "Forecast horizon must be <= {MAX_HORIZON} days (got {}).",
            config.horizon
        )));
    }
    if config.ar_order > MAX_AR_ORDER {
        return Err(AppError::invalid_config(format!(
            "AR order must be <= {MAX_AR_ORDER} (got {}).",
            config.ar_order
        )));
    }
    if config.differencing > MAX_DIFFERENCING {
        return Err(AppError::invalid_config(format!(
            "Differencing order must be <= {MAX_DIFFERENCING} (got {}).",
            config.differencing
        )));
    }
    if let Some(level) = config.confidence_level {
        if !(level.is_finite() && level > 0.0 && level < 1.0) {
            return Err(AppError::invalid_config(format!(
                "Confidence level must be within (0, 1) (got {level})."
            )));
        }
    }
    Ok(())
}

/// Validate a single-category history and return it sorted by date.
pub(crate) fn prepare_history(history: &[TimeSeriesPoint]) -> Result<(String, Vec<TimeSeriesPoint>), AppError> {
    let Some(first) = history.first() else {
        return Err(AppError::insufficient_data("History is empty."));
    };
    let category = first.category.clone();

    if let Some(other) = history.iter().find(|p| p.category != category) {
        return Err(AppError::invalid_config(format!(
            "History mixes categories '{category}' and '{}'; forecast one category at a time.",
            other.category
        )));
    }
    if let Some(bad) = history.iter().find(|p| !(p.value.is_finite() && p.value >= 0.0)) {
        return Err(AppError::invalid_config(format!(
            "Invalid value {} on {} (values must be finite and >= 0).",
            bad.value, bad.date
        )));
    }

    let mut series = history.to_vec();
    series.sort_by_key(|p| p.date);

    let mut gaps = 0usize;
    for w in series.windows(2) {
        let step = (w[1].date - w[0].date).num_days();
        if step == 0 {
            return Err(AppError::invalid_config(format!(
                "Duplicate date {} in history for '{category}'.",
                w[0].date
            )));
        }
        if step > 1 {
            gaps += 1;
        }
    }
    if gaps > 0 {
        warn!("History for '{category}' has {gaps} gap(s); treating observations as consecutive days.");
    }

    Ok((category, series))
}

fn forecast_dates(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>, AppError> {
    let horizon = u64::try_from(horizon)
        .map_err(|_| AppError::invalid_config("Forecast horizon out of range."))?;
    if last.checked_add_days(Days::new(horizon)).is_none() {
        return Err(AppError::invalid_config(format!(
            "{horizon} days after {last} run past the supported calendar range."
        )));
    }
    (1..=horizon)
        .map(|offset| {
            last.checked_add_days(Days::new(offset)).ok_or_else(|| {
                AppError::invalid_config("Forecast dates run past the supported calendar range.")
            })
        })
        .collect()
}

fn confidence_bounds(fit: &ArimaFit, predicted: &[f64], level: f64) -> Result<ConfidenceBounds, AppError> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::model_fit(format!("Normal distribution error: {e}")))?;
    let z = normal.inverse_cdf(0.5 + level / 2.0);

    let std_errors = fit.forecast_std_errors(predicted.len());
    let lower = predicted
        .iter()
        .zip(&std_errors)
        // Sales cannot go negative.
        .map(|(f, se)| (f - z * se).max(0.0))
        .collect();
    let upper = predicted
        .iter()
        .zip(&std_errors)
        .map(|(f, se)| f + z * se)
        .collect();

    Ok(ConfidenceBounds { level, lower, upper })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate;
    use crate::domain::{GenerationConfig, SeasonalityMode};
    use crate::error::ErrorKind;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    }

    fn history(values: &[f64]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TimeSeriesPoint {
                date: day(i as u64),
                category: "Food".to_string(),
                value,
            })
            .collect()
    }

    #[test]
    fn constant_history_forecasts_the_constant() {
        let config = ForecastConfig {
            horizon: 7,
            ..ForecastConfig::default()
        };
        let result = forecast(&history(&[120.0; 30]), &config).unwrap();
        assert_eq!(result.horizon, 7);
        assert_eq!(result.predicted_values.len(), 7);
        assert!(result.predicted_values.iter().all(|v| (v - 120.0).abs() < 1e-6));
        assert_eq!(result.dates[0], day(30));
        assert_eq!(result.dates[6], day(36));
        assert_eq!(result.category, "Food");
        assert_eq!(result.model.label, "ARIMA(5,1,0)");
    }

    #[test]
    fn horizon_always_matches_prediction_count() {
        let points = generate(&GenerationConfig {
            period_count: 90,
            ..GenerationConfig::default()
        })
        .unwrap();
        let series = series_for_category(&points, "Food").unwrap();
        for horizon in [1, 2, 7, 30, 90] {
            let config = ForecastConfig {
                horizon,
                ..ForecastConfig::default()
            };
            let result = forecast(&series, &config).unwrap();
            assert_eq!(result.predicted_values.len(), horizon);
            assert_eq!(result.dates.len(), horizon);
            let bounds = result.confidence_bounds.unwrap();
            assert_eq!(bounds.lower.len(), horizon);
            assert_eq!(bounds.upper.len(), horizon);
        }
    }

    #[test]
    fn forecasts_generated_weekly_series_with_widening_bounds() {
        let gen_config = GenerationConfig {
            seasonality: SeasonalityMode::Weekly,
            ..GenerationConfig::default()
        };
        let points = generate(&gen_config).unwrap();
        let series = series_for_category(&points, "Clothing").unwrap();
        let result = forecast(&series, &ForecastConfig::default()).unwrap();

        assert_eq!(result.predicted_values.len(), 30);
        let bounds = result.confidence_bounds.unwrap();
        for i in 0..30 {
            let f = result.predicted_values[i];
            assert!(f.is_finite());
            assert!(bounds.lower[i] <= f && f <= bounds.upper[i]);
        }
        assert!(bounds.upper[29] - result.predicted_values[29] > bounds.upper[0] - result.predicted_values[0]);
    }

    #[test]
    fn bounds_can_be_disabled() {
        let config = ForecastConfig {
            confidence_level: None,
            ..ForecastConfig::default()
        };
        let result = forecast(&history(&[10.0; 20]), &config).unwrap();
        assert!(result.confidence_bounds.is_none());
    }

    #[test]
    fn unsorted_history_is_sorted_first() {
        let values: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        let mut shuffled = history(&values);
        shuffled.reverse();
        let a = forecast(&shuffled, &ForecastConfig::default()).unwrap();
        let b = forecast(&history(&values), &ForecastConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn short_history_is_insufficient() {
        let err = forecast(&history(&[1.0; 15]), &ForecastConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);

        let err = forecast(&[], &ForecastConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn bad_requests_are_invalid_configuration() {
        let h = history(&[1.0; 40]);
        let bad_configs = [
            ForecastConfig { horizon: 0, ..ForecastConfig::default() },
            ForecastConfig { ar_order: 11, ..ForecastConfig::default() },
            ForecastConfig { differencing: 3, ..ForecastConfig::default() },
            ForecastConfig { confidence_level: Some(1.0), ..ForecastConfig::default() },
        ];
        for config in bad_configs {
            let err = forecast(&h, &config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration, "{config:?}");
        }

        let mut mixed = history(&[1.0; 40]);
        mixed[3].category = "Clothing".to_string();
        assert_eq!(
            forecast(&mixed, &ForecastConfig::default()).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );

        let mut dup = history(&[1.0; 40]);
        dup[5].date = dup[4].date;
        assert_eq!(
            forecast(&dup, &ForecastConfig::default()).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );

        let mut negative = history(&[1.0; 40]);
        negative[0].value = -1.0;
        assert_eq!(
            forecast(&negative, &ForecastConfig::default()).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );
    }

    #[test]
    fn oversized_horizon_is_rejected_before_fitting() {
        let h = history(&[5.0; 40]);
        for horizon in [usize::MAX / 4, MAX_HORIZON + 1] {
            let config = ForecastConfig {
                horizon,
                ..ForecastConfig::default()
            };
            let err = forecast(&h, &config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }

        let at_limit = ForecastConfig {
            horizon: MAX_HORIZON,
            confidence_level: None,
            ..ForecastConfig::default()
        };
        assert_eq!(forecast(&h, &at_limit).unwrap().predicted_values.len(), MAX_HORIZON);
    }

    #[test]
    fn horizon_past_the_calendar_is_invalid_configuration() {
        let late: Vec<TimeSeriesPoint> = (0..40u64)
            .map(|i| TimeSeriesPoint {
                date: NaiveDate::MAX.checked_sub_days(Days::new(60 - i)).unwrap(),
                category: "Food".to_string(),
                value: 10.0 + (i % 3) as f64,
            })
            .collect();
        let config = ForecastConfig {
            horizon: 30,
            ..ForecastConfig::default()
        };
        let err = forecast(&late, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn explosive_history_surfaces_model_fit() {
        let values: Vec<f64> = (0..40).map(|i| 1.1_f64.powi(i)).collect();
        let config = ForecastConfig {
            horizon: 7,
            ar_order: 1,
            differencing: 0,
            confidence_level: Some(0.95),
        };
        let err = forecast(&history(&values), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelFit);
    }

    #[test]
    fn category_lookup() {
        let points = generate(&GenerationConfig {
            period_count: 3,
            ..GenerationConfig::default()
        })
        .unwrap();
        assert_eq!(categories(&points), vec!["Electronics", "Clothing", "Food", "Home Goods"]);
        assert_eq!(series_for_category(&points, "Food").unwrap().len(), 3);
        let err = series_for_category(&points, "Toys").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
