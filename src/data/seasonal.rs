//! Calendar-bucketed seasonal components.
//!
//! Each mode maps a calendar date to an additive uplift (in sales units) that is
//! later scaled per category.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::SeasonalityMode;

/// Weekend uplift: Friday, Saturday, Sunday.
const WEEKLY_UPLIFT: [(Weekday, f64); 3] = [
    (Weekday::Fri, 20.0),
    (Weekday::Sat, 30.0),
    (Weekday::Sun, 40.0),
];

/// Peak reached on the last day of each month.
const MONTH_END_PEAK: f64 = 30.0;

const SUMMER_UPLIFT: f64 = 30.0;
const HOLIDAY_UPLIFT: f64 = 40.0;

/// Additive seasonal value for `date` under `mode`.
pub fn seasonal_component(mode: SeasonalityMode, date: NaiveDate) -> f64 {
    match mode {
        SeasonalityMode::None => 0.0,
        SeasonalityMode::Weekly => WEEKLY_UPLIFT
            .iter()
            .find(|(day, _)| *day == date.weekday())
            .map(|(_, uplift)| *uplift)
            .unwrap_or(0.0),
        SeasonalityMode::Monthly => {
            MONTH_END_PEAK * f64::from(date.day()) / f64::from(days_in_month(date))
        }
        SeasonalityMode::Yearly => match date.month() {
            6..=8 => SUMMER_UPLIFT,
            11 | 12 => HOLIDAY_UPLIFT,
            _ => 0.0,
        },
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days() as u32,
        // Only reachable at the very end of chrono's supported range.
        _ => 31,
    }
}
