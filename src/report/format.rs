//! Formatted terminal output.
//!
//! We keep formatting code in one place so the generator and forecaster stay
//! free of presentation concerns.

use std::path::Path;

use crate::domain::{ForecastMetrics, ForecastResult, GenerationConfig, SeriesStats};

/// Summary printed after `salesfc generate`.
pub fn format_generation_summary(config: &GenerationConfig, stats: &[SeriesStats], output: &Path) -> String {
    let mut out = String::new();

    out.push_str("=== salesfc - Synthetic Sales Data ===\n");
    out.push_str(&format!(
        "Range: {} + {} days | seasonality={} | trend={:.2} | noise={:.2}\n",
        config.start_date,
        config.period_count,
        config.seasonality.display_name(),
        config.trend_strength,
        config.noise_level,
    ));
    out.push_str(&format!(
        "Seed: {} | promo_rate={:.3} | events={}\n",
        config.seed,
        config.promo_rate,
        config.event_dates.len()
    ));
    let rows: usize = stats.iter().map(|s| s.n).sum();
    out.push_str(&format!("Output: {} ({rows} rows)\n\n", output.display()));

    if stats.is_empty() {
        out.push_str("No categories configured; the file holds only a header.\n");
        return out;
    }

    out.push_str(
        format!(
            "{:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "category", "n", "first", "last", "min", "max", "mean", "slope/day"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<16} {:-<6} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}\n",
        "", "", "", "", "", "", "", ""
    ));
    for s in stats {
        out.push_str(&format!(
            "{:<16} {:>6} {:>10} {:>10} {:>10.2} {:>10.2} {:>10.2} {:>10.4}\n",
            truncate(&s.category, 16),
            s.n,
            s.first_date,
            s.last_date,
            s.min,
            s.max,
            s.mean,
            s.slope
        ));
    }

    out
}

/// Forecast table plus model parameters and (optional) holdout metrics.
pub fn format_forecast(result: &ForecastResult, metrics: Option<&ForecastMetrics>) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== salesfc - Forecast: {} ===\n", result.category));
    out.push_str(&format!(
        "Model: {} fitted on {} days | sigma2={:.4}\n",
        result.model.label, result.model.n_obs, result.model.sigma2
    ));
    out.push_str(&format!("- phi: {}\n", fmt_vec(&result.model.coefficients)));
    if result.model.differencing == 0 {
        out.push_str(&format!("- intercept: {:.6}\n", result.model.intercept));
    }
    match metrics {
        Some(m) => out.push_str(&format!(
            "Holdout ({} days): MAE={:.3} MSE={:.3} RMSE={:.3}\n",
            m.holdout,
            m.mae,
            m.mse,
            m.mse.sqrt()
        )),
        None => out.push_str("Holdout: n/a\n"),
    }
    out.push('\n');

    match &result.confidence_bounds {
        Some(bounds) => {
            let pct = format!("{:.0}%", bounds.level * 100.0);
            out.push_str(&format!(
                "{:<10} {:>12} {:>12} {:>12}\n",
                "date",
                "forecast",
                format!("lo {pct}"),
                format!("hi {pct}")
            ));
            out.push_str(&format!("{:-<10} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
            for i in 0..result.horizon {
                out.push_str(&format!(
                    "{:<10} {:>12.2} {:>12.2} {:>12.2}\n",
                    result.dates[i], result.predicted_values[i], bounds.lower[i], bounds.upper[i]
                ));
            }
        }
        None => {
            out.push_str(&format!("{:<10} {:>12}\n", "date", "forecast"));
            out.push_str(&format!("{:-<10} {:-<12}\n", "", ""));
            for (date, value) in result.dates.iter().zip(&result.predicted_values) {
                out.push_str(&format!("{date:<10} {value:>12.2}\n"));
            }
        }
    }

    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{ConfidenceBounds, ModelSummary};

    fn sample_result(bounds: bool) -> ForecastResult {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        ForecastResult {
            category: "Food".to_string(),
            horizon: 2,
            dates: vec![d(1), d(2)],
            predicted_values: vec![100.0, 101.5],
            confidence_bounds: bounds.then(|| ConfidenceBounds {
                level: 0.95,
                lower: vec![90.0, 88.0],
                upper: vec![110.0, 115.0],
            }),
            model: ModelSummary {
                label: "ARIMA(1,1,0)".to_string(),
                ar_order: 1,
                differencing: 1,
                intercept: 0.0,
                coefficients: vec![0.25],
                sigma2: 9.0,
                n_obs: 60,
            },
        }
    }

    #[test]
    fn forecast_table_lists_every_day() {
        let metrics = ForecastMetrics {
            holdout: 2,
            mae: 3.0,
            mse: 16.0,
        };
        let text = format_forecast(&sample_result(true), Some(&metrics));
        assert!(text.contains("ARIMA(1,1,0)"));
        assert!(text.contains("[0.250000]"));
        assert!(text.contains("RMSE=4.000"));
        assert!(text.contains("lo 95%"));
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("115.00"));
    }

    #[test]
    fn forecast_table_without_bounds() {
        let text = format_forecast(&sample_result(false), None);
        assert!(text.contains("Holdout: n/a"));
        assert!(!text.contains("lo "));
        assert!(text.contains("101.50"));
    }

    #[test]
    fn generation_summary_counts_rows() {
        let config = GenerationConfig::default();
        let stats = vec![SeriesStats {
            category: "A very long category name".to_string(),
            n: 365,
            first_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            last_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            min: 1.0,
            max: 2.0,
            mean: 1.5,
            slope: 0.01,
        }];
        let text = format_generation_summary(&config, &stats, Path::new("sales_data.csv"));
        assert!(text.contains("sales_data.csv (365 rows)"));
        assert!(text.contains("seasonality=weekly"));
        assert!(text.contains("A very long cat."));
    }

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("Food", 16), "Food");
        assert_eq!(truncate("abcdef", 4), "abc.");
    }
}
