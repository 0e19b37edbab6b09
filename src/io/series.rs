//! CSV read/write for sales series.
//!
//! The on-disk schema is a long table:
//!
//! ```text
//! date,category,value
//! 2023-01-01,Electronics,97.31
//! ```
//!
//! Reading is lenient per row (bad rows are reported and skipped) but strict on
//! the schema (missing columns are a configuration error).

use std::collections::HashMap;
use std::fs::{File, create_dir_all};
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use log::{info, warn};

use crate::domain::TimeSeriesPoint;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 3] = ["date", "category", "value"];

/// A row-level error encountered while reading.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Read output: valid points plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub points: Vec<TimeSeriesPoint>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Write points to `path`, creating parent directories as needed.
pub fn write_series_csv(path: &Path, points: &[TimeSeriesPoint]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(REQUIRED_COLUMNS)
        .map_err(|e| AppError::io(format!("Failed to write CSV header: {e}")))?;
    for p in points {
        writer
            .write_record([
                p.date.format("%Y-%m-%d").to_string(),
                p.category.clone(),
                format!("{:.2}", p.value),
            ])
            .map_err(|e| AppError::io(format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush CSV '{}': {e}", path.display())))?;

    info!("Wrote {} rows to {}", points.len(), path.display());
    Ok(())
}

/// Read a `date,category,value` CSV.
pub fn read_series_csv(path: &Path) -> Result<LoadedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_config(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::invalid_config(format!(
                "Missing required column `{column}` in '{}'.",
                path.display()
            )));
        }
    }

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &header_map));
        match parsed {
            Ok(point) => points.push(point),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in row_errors.iter().take(5) {
        warn!("Skipping line {}: {}", err.line, err.message);
    }
    if row_errors.len() > 5 {
        warn!("... and {} more skipped rows", row_errors.len() - 5);
    }

    if points.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "No valid rows in '{}'.",
            path.display()
        )));
    }

    info!(
        "Read {} of {} rows from {}",
        points.len(),
        rows_read,
        path.display()
    );
    Ok(LoadedSeries {
        points,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn field<'r>(record: &'r StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<&'r str, String> {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing `{name}`"))
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<TimeSeriesPoint, String> {
    let raw_date = field(record, header_map, "date")?;
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{raw_date}': {e}"))?;
    let category = field(record, header_map, "category")?.to_string();
    let raw_value = field(record, header_map, "value")?;
    let value: f64 = raw_value
        .parse()
        .map_err(|e| format!("invalid value '{raw_value}': {e}"))?;
    if !(value.is_finite() && value >= 0.0) {
        return Err(format!("value {value} must be finite and >= 0"));
    }

    Ok(TimeSeriesPoint {
        date,
        category,
        value,
    })
}
