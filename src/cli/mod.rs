//! Command-line parsing for the sales data generator and forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the generation and modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{EventDate, SeasonalityMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesfc", version, about = "Synthetic sales data generator and ARIMA forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a synthetic daily sales dataset and write it as CSV.
    Generate(GenerateArgs),
    /// Fit an ARIMA model to one category of a sales CSV and forecast ahead.
    Forecast(ForecastArgs),
    /// Print a previously exported forecast JSON.
    Show(ShowArgs),
}

/// Options for dataset generation.
///
/// Long flags use underscores so existing generator invocations
/// (`--start_date`, `--trend_strength`, ...) keep working.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// First day of the series (YYYY-MM-DD).
    #[arg(long = "start_date", default_value = "2023-01-01")]
    pub start_date: String,

    /// Number of days to generate per category.
    #[arg(long, default_value_t = 365, allow_negative_numbers = true)]
    pub periods: i64,

    /// Seasonal pattern added on top of the trend.
    #[arg(long, value_enum, default_value_t = SeasonalityMode::Weekly)]
    pub seasonality: SeasonalityMode,

    /// Linear drift over the whole range (0 to 1).
    #[arg(long = "trend_strength", default_value_t = 0.5, allow_negative_numbers = true)]
    pub trend_strength: f64,

    /// Gaussian noise scale (>= 0).
    #[arg(long = "noise_level", default_value_t = 0.2, allow_negative_numbers = true)]
    pub noise_level: f64,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "sales_data.csv")]
    pub output: PathBuf,

    /// Comma-separated category names (default: Electronics,Clothing,Food,Home Goods).
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Dated boost as DATE:MULTIPLIER, e.g. 2023-11-24:1.8 (repeatable).
    #[arg(long = "event", value_name = "DATE:MULTIPLIER")]
    pub events: Vec<EventDate>,

    /// Fraction of days that get a random promotional boost.
    #[arg(long = "promo_rate", default_value_t = 0.05, allow_negative_numbers = true)]
    pub promo_rate: f64,

    /// Random seed (picked at random and logged when absent).
    #[arg(long, env = "SALESFC_SEED")]
    pub seed: Option<u64>,

    /// Skip the per-category summary.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Options for forecasting.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Sales CSV with date, category and value columns.
    #[arg(short = 'i', long, default_value = "sales_data.csv")]
    pub input: PathBuf,

    /// Category to forecast (default: first category in the file).
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Number of days to forecast.
    #[arg(long, default_value_t = 30)]
    pub horizon: usize,

    /// AR order p.
    #[arg(long = "ar_order", default_value_t = 5)]
    pub ar_order: usize,

    /// Differencing order d.
    #[arg(long, default_value_t = 1)]
    pub differencing: usize,

    /// Coverage of the prediction bounds.
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    /// Skip the prediction bounds.
    #[arg(long = "no_bounds")]
    pub no_bounds: bool,

    /// Skip the holdout evaluation.
    #[arg(long = "no_metrics")]
    pub no_metrics: bool,

    /// Export the forecast to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for printing a saved forecast.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Forecast JSON file produced by `salesfc forecast --export`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,
}
