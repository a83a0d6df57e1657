//! Day-first date coercion for the `Date` column

use crate::constants::{DATE_TIME_SUFFIXES, DAY_FIRST_DATE_FORMATS, ISO_DATE_FORMATS};
use chrono::{NaiveDate, NaiveDateTime};

/// Parse a date cell, reading ambiguous numeric dates day-first.
///
/// `"05/03/2024"` is 5 March 2024. Date-only values land at midnight.
/// Returns `None` for anything unrecognised; callers decide whether that is
/// fatal.
pub fn parse_day_first(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DAY_FIRST_DATE_FORMATS
        .iter()
        .chain(ISO_DATE_FORMATS)
        .find_map(|date_format| parse_with_format(value, date_format))
}

fn parse_with_format(value: &str, date_format: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(value, date_format) {
        return date.and_hms_opt(0, 0, 0);
    }

    DATE_TIME_SUFFIXES.iter().find_map(|suffix| {
        NaiveDateTime::parse_from_str(value, &format!("{date_format}{suffix}")).ok()
    })
}
