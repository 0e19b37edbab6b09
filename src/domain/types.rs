//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed in-memory between the synthesizer and the forecaster
//! - exported to CSV/JSON
//! - handed to a presentation layer as plain data

use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Category names used when the caller does not supply any.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Electronics", "Clothing", "Food", "Home Goods"];

/// Hard limits on the ARIMA orders accepted by the forecaster.
pub const MAX_AR_ORDER: usize = 10;
pub const MAX_DIFFERENCING: usize = 2;

/// Longest forecast horizon accepted, in days (about 100 years).
pub const MAX_HORIZON: usize = 36_500;

/// Which repeating pattern is added on top of the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// Trend and noise only.
    None,
    /// Weekend uplift (Friday < Saturday < Sunday).
    Weekly,
    /// Sales ramp up towards the end of each month.
    Monthly,
    /// Summer and holiday-season peaks.
    Yearly,
}

impl SeasonalityMode {
    pub const ALL: [SeasonalityMode; 4] = [
        SeasonalityMode::None,
        SeasonalityMode::Weekly,
        SeasonalityMode::Monthly,
        SeasonalityMode::Yearly,
    ];

    /// Parse a mode name coming from an untyped boundary.
    ///
    /// The CLI parses modes through clap's `ValueEnum`; this is the entry point
    /// for callers holding a plain string, such as a web form field.
    pub fn parse(name: &str) -> Result<Self, AppError> {
        <Self as ValueEnum>::from_str(name.trim(), true).map_err(|_| {
            AppError::invalid_config(format!(
                "Unknown seasonality mode '{name}' (expected none, weekly, monthly or yearly)."
            ))
        })
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            SeasonalityMode::None => "none",
            SeasonalityMode::Weekly => "weekly",
            SeasonalityMode::Monthly => "monthly",
            SeasonalityMode::Yearly => "yearly",
        }
    }
}

/// A single observation of daily sales for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub category: String,
    pub value: f64,
}

/// A dated multiplicative boost (promotion, holiday).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventDate {
    pub date: NaiveDate,
    pub multiplier: f64,
}

impl FromStr for EventDate {
    type Err = AppError;

    /// Parses `YYYY-MM-DD:MULTIPLIER`, e.g. `2023-11-24:1.8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, multiplier) = s.trim().split_once(':').ok_or_else(|| {
            AppError::invalid_config(format!("Invalid event '{s}': expected DATE:MULTIPLIER."))
        })?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            AppError::invalid_config(format!("Invalid event date '{date}': {e}"))
        })?;
        let multiplier: f64 = multiplier.trim().parse().map_err(|e| {
            AppError::invalid_config(format!("Invalid event multiplier '{multiplier}': {e}"))
        })?;
        Ok(EventDate { date, multiplier })
    }
}

/// Parameters of one synthetic dataset.
///
/// The seed is part of the configuration: two calls with equal configs produce
/// identical series.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub start_date: NaiveDate,
    /// Number of consecutive days per category. Must be > 0.
    pub period_count: i64,
    pub seasonality: SeasonalityMode,
    /// Linear drift over the whole range, in `[0, 1]`.
    pub trend_strength: f64,
    /// Gaussian noise scale, `>= 0`.
    pub noise_level: f64,
    pub categories: Vec<String>,
    pub event_dates: Vec<EventDate>,
    /// Fraction of days that receive a random promotional boost, in `[0, 1)`.
    pub promo_rate: f64,
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            period_count: 365,
            seasonality: SeasonalityMode::Weekly,
            trend_strength: 0.5,
            noise_level: 0.2,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            event_dates: Vec::new(),
            promo_rate: 0.05,
            seed: 42,
        }
    }
}

/// Parameters of one forecast request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Number of future days to predict. Must be > 0.
    pub horizon: usize,
    /// AR order `p`.
    pub ar_order: usize,
    /// Differencing order `d`.
    pub differencing: usize,
    /// Two-sided coverage of the bounds, or `None` to skip them.
    pub confidence_level: Option<f64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 30,
            ar_order: 5,
            differencing: 1,
            confidence_level: Some(0.95),
        }
    }
}

impl ForecastConfig {
    /// Shortest history the model can be fitted on.
    ///
    /// Besides `p + d + 10` observations, the regression needs more rows than
    /// parameters once `d` values are lost to differencing and `p` to lags.
    pub fn min_history(&self) -> usize {
        let p = self.ar_order;
        let d = self.differencing;
        (p + d + 10).max(2 * p + d + 2)
    }

    /// Label in the usual `ARIMA(p,d,q)` notation.
    pub fn model_label(&self) -> String {
        format!("ARIMA({},{},0)", self.ar_order, self.differencing)
    }
}

/// Fitted ARIMA(p, d, 0) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub label: String,
    pub ar_order: usize,
    pub differencing: usize,
    /// Constant term of the differenced regression (only fitted when `d = 0`).
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Residual variance of the one-step-ahead fit.
    pub sigma2: f64,
    /// Number of history points the model was fitted on.
    pub n_obs: usize,
}

/// Lower/upper prediction bounds at a given coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBounds {
    pub level: f64,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Output of a single forecast call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub category: String,
    pub horizon: usize,
    /// The `horizon` calendar days following the last history date.
    pub dates: Vec<NaiveDate>,
    pub predicted_values: Vec<f64>,
    pub confidence_bounds: Option<ConfidenceBounds>,
    pub model: ModelSummary,
}

/// Holdout error of a forecast fitted on a truncated history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub holdout: usize,
    pub mae: f64,
    pub mse: f64,
}

/// Summary statistics of one category's series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub category: String,
    pub n: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Least-squares slope per day.
    pub slope: f64,
}

/// A saved forecast file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub source: Option<String>,
    pub forecast: ForecastResult,
    pub metrics: Option<ForecastMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonality_parse_is_case_insensitive() {
        assert_eq!(SeasonalityMode::parse("Weekly").unwrap(), SeasonalityMode::Weekly);
        assert_eq!(SeasonalityMode::parse(" yearly ").unwrap(), SeasonalityMode::Yearly);
        assert_eq!(SeasonalityMode::parse("none").unwrap(), SeasonalityMode::None);
    }

    #[test]
    fn seasonality_parse_rejects_unknown_mode() {
        let err = SeasonalityMode::parse("hourly").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn event_date_parses_date_and_multiplier() {
        let ev: EventDate = "2023-11-24:1.8".parse().unwrap();
        assert_eq!(ev.date, NaiveDate::from_ymd_opt(2023, 11, 24).unwrap());
        assert!((ev.multiplier - 1.8).abs() < 1e-12);

        assert!("2023-11-24".parse::<EventDate>().is_err());
        assert!("2023-13-01:1.5".parse::<EventDate>().is_err());
        assert!("2023-11-24:lots".parse::<EventDate>().is_err());
    }

    #[test]
    fn min_history_covers_regression_rows() {
        let cfg = ForecastConfig::default();
        assert_eq!(cfg.min_history(), 16);
        assert_eq!(cfg.model_label(), "ARIMA(5,1,0)");

        let wide = ForecastConfig {
            ar_order: 10,
            differencing: 0,
            ..ForecastConfig::default()
        };
        // rows = n - p must exceed p + 1 parameters.
        assert_eq!(wide.min_history(), 22);
    }
}
