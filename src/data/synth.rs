//! Synthetic daily sales generation.
//!
//! Every category gets its own scaled copy of a shared trend and seasonal
//! pattern plus independent Gaussian noise. Promotional boosts are drawn once
//! per dataset so that a promotion lifts every category on the same day.

use chrono::{Days, NaiveDate};
use log::{debug, warn};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::seq::index;
use rand_distr::Normal;

use crate::data::seasonal::seasonal_component;
use crate::domain::{GenerationConfig, TimeSeriesPoint};
use crate::error::AppError;

/// Starting sales level before trend.
const BASE_LEVEL: f64 = 100.0;
/// Total rise over the whole range at `trend_strength = 1`.
const TREND_SCALE: f64 = 100.0;
/// Noise standard deviation at `noise_level = 1`.
const NOISE_SCALE: f64 = 80.0;

const CATEGORY_TREND_RANGE: (f64, f64) = (0.6, 1.4);
const CATEGORY_SEASONAL_RANGE: (f64, f64) = (0.8, 1.2);
const PROMO_BOOST_RANGE: (f64, f64) = (1.2, 1.5);

/// Generate a synthetic sales series.
///
/// Output is date-major: all categories for `start_date`, then the next day, and
/// so on, with categories in configuration order.
pub fn generate(config: &GenerationConfig) -> Result<Vec<TimeSeriesPoint>, AppError> {
    let periods = validate(config)?;
    let dates = date_range(config.start_date, periods)?;

    if config.categories.is_empty() {
        debug!("No categories configured; generated series is empty.");
        return Ok(Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_level * NOISE_SCALE)
        .map_err(|e| AppError::invalid_config(format!("Noise distribution error: {e}")))?;

    let trend = linspace(
        BASE_LEVEL,
        BASE_LEVEL + TREND_SCALE * config.trend_strength,
        periods,
    );
    let seasonal: Vec<f64> = dates
        .iter()
        .map(|&d| seasonal_component(config.seasonality, d))
        .collect();
    let boosts = event_multipliers(&mut rng, &dates, config);

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        let trend_mult = rng.gen_range(CATEGORY_TREND_RANGE.0..=CATEGORY_TREND_RANGE.1);
        let seasonal_mult = rng.gen_range(CATEGORY_SEASONAL_RANGE.0..=CATEGORY_SEASONAL_RANGE.1);
        debug!("Category '{category}': trend x{trend_mult:.3}, seasonal x{seasonal_mult:.3}");

        let mut values = Vec::with_capacity(periods);
        for i in 0..periods {
            let raw = trend[i] * trend_mult + seasonal[i] * seasonal_mult + noise.sample(&mut rng);
            // Floor first, then boost: multipliers are positive so the floor holds.
            values.push(round2(raw.max(0.0) * boosts[i]));
        }
        columns.push(values);
    }

    let mut points = Vec::with_capacity(periods * config.categories.len());
    for (i, date) in dates.iter().enumerate() {
        for (category, values) in config.categories.iter().zip(&columns) {
            points.push(TimeSeriesPoint {
                date: *date,
                category: category.clone(),
                value: values[i],
            });
        }
    }

    Ok(points)
}

/// Check the config and return the period count as `usize`.
fn validate(config: &GenerationConfig) -> Result<usize, AppError> {
    if config.period_count <= 0 {
        return Err(AppError::invalid_config(format!(
            "Periods must be > 0 (got {}).",
            config.period_count
        )));
    }
    let periods = usize::try_from(config.period_count)
        .map_err(|_| AppError::invalid_config("Periods out of range."))?;

    if !(config.trend_strength.is_finite() && (0.0..=1.0).contains(&config.trend_strength)) {
        return Err(AppError::invalid_config(format!(
            "Trend strength must be within [0, 1] (got {}).",
            config.trend_strength
        )));
    }
    if !(config.noise_level.is_finite() && config.noise_level >= 0.0) {
        return Err(AppError::invalid_config(format!(
            "Noise level must be >= 0 (got {}).",
            config.noise_level
        )));
    }
    if !(config.promo_rate.is_finite() && (0.0..1.0).contains(&config.promo_rate)) {
        return Err(AppError::invalid_config(format!(
            "Promotion rate must be within [0, 1) (got {}).",
            config.promo_rate
        )));
    }
    for event in &config.event_dates {
        if !(event.multiplier.is_finite() && event.multiplier > 0.0) {
            return Err(AppError::invalid_config(format!(
                "Event multiplier for {} must be > 0 (got {}).",
                event.date, event.multiplier
            )));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for category in &config.categories {
        if category.trim().is_empty() {
            return Err(AppError::invalid_config("Category names must not be blank."));
        }
        if !seen.insert(category.as_str()) {
            return Err(AppError::invalid_config(format!(
                "Duplicate category '{category}'."
            )));
        }
    }

    Ok(periods)
}

fn date_range(start: NaiveDate, periods: usize) -> Result<Vec<NaiveDate>, AppError> {
    let last_offset = u64::try_from(periods - 1)
        .map_err(|_| AppError::invalid_config("Periods out of range."))?;
    if start.checked_add_days(Days::new(last_offset)).is_none() {
        return Err(AppError::invalid_config(format!(
            "{periods} days from {start} run past the supported calendar range."
        )));
    }
    Ok(start.iter_days().take(periods).collect())
}

/// Per-day multipliers from random promotions and explicit events.
fn event_multipliers(rng: &mut StdRng, dates: &[NaiveDate], config: &GenerationConfig) -> Vec<f64> {
    let periods = dates.len();
    let mut boosts = vec![1.0; periods];

    let promo_days = (config.promo_rate * periods as f64).floor() as usize;
    for idx in index::sample(rng, periods, promo_days.min(periods)) {
        boosts[idx] *= rng.gen_range(PROMO_BOOST_RANGE.0..PROMO_BOOST_RANGE.1);
    }
    debug!("Applied {promo_days} random promotion days.");

    let start = dates[0];
    for event in &config.event_dates {
        let offset = (event.date - start).num_days();
        match usize::try_from(offset) {
            Ok(idx) if idx < periods => boosts[idx] *= event.multiplier,
            _ => warn!(
                "Event on {} is outside {}..{}; ignoring it.",
                event.date,
                start,
                dates[periods - 1]
            ),
        }
    }

    boosts
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n as f64 - 1.0);
    (0..n).map(|i| start + step * i as f64).collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
