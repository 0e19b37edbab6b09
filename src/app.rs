//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds generation/forecast configs
//! - runs the pipelines
//! - prints reports and writes optional exports

use chrono::NaiveDate;
use clap::Parser;
use log::info;

use crate::cli::{Command, ForecastArgs, GenerateArgs, ShowArgs};
use crate::domain::{DEFAULT_CATEGORIES, ForecastConfig, GenerationConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `salesfc` binary.
pub fn run() -> Result<(), AppError> {
    // `salesfc --periods 730` should behave like `salesfc generate --periods 730`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = generation_config_from_args(&args)?;
    let run = pipeline::run_generate(&config, &args.output)?;

    if !args.quiet {
        println!(
            "{}",
            crate::report::format_generation_summary(&config, &run.stats, &args.output)
        );
    }
    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args);
    let run = pipeline::run_forecast(
        &args.input,
        args.category.as_deref(),
        &config,
        !args.no_metrics,
    )?;

    if !run.loaded.row_errors.is_empty() {
        println!(
            "Skipped {} of {} rows in {}.",
            run.loaded.row_errors.len(),
            run.loaded.rows_read,
            args.input.display()
        );
    }
    println!(
        "{}",
        crate::report::format_forecast(&run.result, run.metrics.as_ref())
    );

    if let Some(path) = &args.export {
        crate::io::write_forecast_json(path, &run.result, run.metrics.as_ref(), Some(&args.input))?;
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = crate::io::read_forecast_json(&args.forecast)?;
    if let Some(source) = &file.source {
        println!("Source: {source}");
    }
    println!(
        "{}",
        crate::report::format_forecast(&file.forecast, file.metrics.as_ref())
    );
    Ok(())
}

/// Build a [`GenerationConfig`] from CLI flags.
///
/// Range checks happen in the generator; this only handles parsing and defaults.
pub fn generation_config_from_args(args: &GenerateArgs) -> Result<GenerationConfig, AppError> {
    let start_date = NaiveDate::parse_from_str(args.start_date.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::invalid_config(format!(
            "Invalid start date '{}' (expected YYYY-MM-DD): {e}",
            args.start_date
        ))
    })?;

    let mut categories: Vec<String> = args
        .categories
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if categories.is_empty() {
        categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    }

    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!("No seed given; using {seed} (pass --seed {seed} to reproduce)");
            seed
        }
    };

    Ok(GenerationConfig {
        start_date,
        period_count: args.periods,
        seasonality: args.seasonality,
        trend_strength: args.trend_strength,
        noise_level: args.noise_level,
        categories,
        event_dates: args.events.clone(),
        promo_rate: args.promo_rate,
        seed,
    })
}

pub fn forecast_config_from_args(args: &ForecastArgs) -> ForecastConfig {
    ForecastConfig {
        horizon: args.horizon,
        ar_order: args.ar_order,
        differencing: args.differencing,
        confidence_level: (!args.no_bounds).then_some(args.confidence),
    }
}

/// Rewrite argv so bare flags default to `salesfc generate`.
///
/// Rules:
/// - `salesfc`                          -> `salesfc generate`
/// - `salesfc --periods 730 ...`        -> `salesfc generate --periods 730 ...`
/// - `salesfc --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("generate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "generate" | "forecast" | "show");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "generate".to_string());
        return argv;
    }

    argv
}
