//! Reporting utilities: per-category statistics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{SeriesStats, TimeSeriesPoint};
use crate::forecast::categories;
use crate::math::{linear_slope, mean};

/// Summary statistics for each category, in first-seen order.
pub fn series_stats(points: &[TimeSeriesPoint]) -> Vec<SeriesStats> {
    categories(points)
        .into_iter()
        .filter_map(|category| {
            let mut series: Vec<&TimeSeriesPoint> =
                points.iter().filter(|p| p.category == category).collect();
            series.sort_by_key(|p| p.date);
            let values: Vec<f64> = series.iter().map(|p| p.value).collect();

            let first = series.first()?;
            let last = series.last()?;
            Some(SeriesStats {
                n: values.len(),
                first_date: first.date,
                last_date: last.date,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                mean: mean(&values)?,
                slope: linear_slope(&values).unwrap_or(0.0),
                category,
            })
        })
        .collect()
}
