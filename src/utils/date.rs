// src/utils/date.rs

//! Calendar date helpers for spreadsheet data.
//!
//! Spreadsheets store dates as day counts from 1899-12-30 and users type
//! dates in a handful of textual layouts. Everything here resolves to a
//! plain [`NaiveDate`]; formatting back to text always uses `YYYY-MM-DD`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Canonical output layout.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Exclusive upper bound of the "plausible serial day count" heuristic.
pub const SERIAL_HEURISTIC_LIMIT: f64 = 100_000.0;

/// Largest day count a spreadsheet date code can hold (9999-12-31).
pub const MAX_DATE_CODE: f64 = 2_958_465.0;

/// Date-only layouts with a four-digit year, tried in order.
const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
];

/// Two-digit year layouts, tried after every four-digit layout has failed.
/// Years 00-69 land in the 2000s and 70-99 in the 1900s.
const SHORT_YEAR_LAYOUTS: &[&str] = &["%m/%d/%y", "%m-%d-%y", "%d-%b-%y", "%d %b %y"];

/// Date-time layouts with a four-digit year; the time part is dropped.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Day 0 of the spreadsheet serial calendar.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// `%Y` also matches one to three digits, so `1/6/24` would otherwise
/// read as year 1 through `%Y/%m/%d`.
fn four_digit_year(date: NaiveDate) -> Option<NaiveDate> {
    (1000..=9999).contains(&date.year()).then_some(date)
}

/// Format a date as `YYYY-MM-DD`.
pub fn canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Convert a serial day count to a date by plain offset from 1899-12-30.
///
/// Any fractional part is a time of day and is truncated. Returns `None`
/// for non-finite values or results outside chrono's range.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if days.abs() > i32::MAX as f64 {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::try_days(days as i64)?)
}

/// Whether a numeric cell should be read as a serial day count.
pub fn is_plausible_serial(value: f64) -> bool {
    value > 0.0 && value < SERIAL_HEURISTIC_LIMIT
}

/// Decode a spreadsheet date code.
///
/// Unlike [`serial_to_date`] this follows the 1900 date system literally:
/// code 0 is "January 0, 1900" (1899-12-31) and code 60 is the phantom
/// 1900-02-29, which lands on 1900-03-01. Codes outside `0..=2958465`
/// are rejected.
pub fn date_code_to_date(code: f64) -> Option<NaiveDate> {
    if !code.is_finite() || !(0.0..=MAX_DATE_CODE).contains(&code) {
        return None;
    }
    let days = code.floor() as i64;
    let jan_zero = NaiveDate::from_ymd_opt(1899, 12, 31)?;
    match days {
        0..=59 => jan_zero.checked_add_signed(Duration::try_days(days)?),
        60 => NaiveDate::from_ymd_opt(1900, 3, 1),
        _ => serial_to_date(days as f64),
    }
}

/// Decode a textual date code such as `"45297"`.
pub fn date_code_text_to_date(text: &str) -> Option<NaiveDate> {
    text.trim().parse::<f64>().ok().and_then(date_code_to_date)
}

/// Parse free-form date text.
///
/// Month-first is assumed for slash and dash layouts with the year last,
/// so `03/04/2024` is March 4th. Two-digit years such as `1/6/24` are
/// accepted once no four-digit layout fits.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    DATE_LAYOUTS
        .iter()
        .find_map(|layout| {
            NaiveDate::parse_from_str(text, layout)
                .ok()
                .and_then(four_digit_year)
        })
        .or_else(|| {
            DATETIME_LAYOUTS.iter().find_map(|layout| {
                NaiveDateTime::parse_from_str(text, layout)
                    .ok()
                    .and_then(|dt| four_digit_year(dt.date()))
            })
        })
        .or_else(|| {
            SHORT_YEAR_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        })
}
