use chrono::NaiveDate;

use sales_forecast::app::pipeline::{run_forecast, run_generate};
use sales_forecast::domain::{ForecastConfig, GenerationConfig, SeasonalityMode};
use sales_forecast::error::ErrorKind;
use sales_forecast::io::{read_forecast_json, read_series_csv, write_forecast_json};

fn two_year_config() -> GenerationConfig {
    GenerationConfig {
        start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        period_count: 730,
        seasonality: SeasonalityMode::Yearly,
        trend_strength: 0.3,
        noise_level: 0.1,
        seed: 2024,
        ..GenerationConfig::default()
    }
}

#[test]
fn generated_file_reads_back_per_category() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("sales.csv");

    let run = run_generate(&two_year_config(), &path).unwrap();
    assert_eq!(run.rows, 4 * 730);
    assert_eq!(run.stats.len(), 4);

    let loaded = read_series_csv(&path).unwrap();
    assert!(loaded.row_errors.is_empty());
    assert_eq!(loaded.points.len(), 4 * 730);

    for stats in &run.stats {
        assert_eq!(stats.n, 730);
        assert_eq!(stats.first_date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(stats.last_date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(stats.min >= 0.0);
    }
}

#[test]
fn forecast_from_generated_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sales.csv");
    run_generate(&two_year_config(), &data).unwrap();

    let config = ForecastConfig::default();
    let run = run_forecast(&data, Some("Clothing"), &config, true).unwrap();

    let result = &run.result;
    assert_eq!(result.category, "Clothing");
    assert_eq!(result.predicted_values.len(), 30);
    assert_eq!(result.dates[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(result.dates[29], NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
    assert!(result.predicted_values.iter().all(|v| v.is_finite()));

    let bounds = result.confidence_bounds.as_ref().unwrap();
    for i in 0..30 {
        assert!(bounds.lower[i] <= result.predicted_values[i].max(0.0));
        assert!(result.predicted_values[i] <= bounds.upper[i]);
    }

    let metrics = run.metrics.unwrap();
    assert_eq!(metrics.holdout, 30);
    assert!(metrics.mae >= 0.0 && metrics.mse >= metrics.mae * metrics.mae - 1e-9);

    let json = dir.path().join("forecast.json");
    write_forecast_json(&json, result, run.metrics.as_ref(), Some(&data)).unwrap();
    let saved = read_forecast_json(&json).unwrap();
    assert_eq!(saved.forecast.dates, result.dates);
    assert_eq!(saved.forecast.model.label, "ARIMA(5,1,0)");
    for (a, b) in saved.forecast.predicted_values.iter().zip(&result.predicted_values) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn forecast_defaults_to_first_category() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sales.csv");
    run_generate(&two_year_config(), &data).unwrap();

    let run = run_forecast(&data, None, &ForecastConfig::default(), false).unwrap();
    assert_eq!(run.result.category, "Electronics");
    assert!(run.metrics.is_none());
}

#[test]
fn unknown_category_and_missing_file_fail() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sales.csv");
    run_generate(&two_year_config(), &data).unwrap();

    let err = run_forecast(&data, Some("Toys"), &ForecastConfig::default(), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);

    let err = run_forecast(&dir.path().join("missing.csv"), None, &ForecastConfig::default(), false)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn short_history_skips_metrics_but_still_forecasts() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("short.csv");
    let config = GenerationConfig {
        period_count: 40,
        categories: vec!["Food".to_string()],
        ..two_year_config()
    };
    run_generate(&config, &data).unwrap();

    let forecast_config = ForecastConfig {
        horizon: 30,
        ..ForecastConfig::default()
    };
    let run = run_forecast(&data, None, &forecast_config, true).unwrap();
    assert_eq!(run.result.predicted_values.len(), 30);
    assert!(run.metrics.is_none());
}
