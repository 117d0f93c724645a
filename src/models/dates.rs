//! Date and month handling for both [`DateMode`]s.
//!
//! In lexical mode values are only checked against their textual shape and
//! compared as strings. In calendar mode they are parsed with chrono and
//! stored in canonical form.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::DateMode;
use crate::error::{FinanceError, FinanceResult};

#[allow(clippy::expect_used)]
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

#[allow(clippy::expect_used)]
static MONTH_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("valid month pattern"));

/// Validate an expense or subscription date and return the value to store.
pub(crate) fn normalize_date(mode: DateMode, raw: &str) -> FinanceResult<String> {
    let raw = raw.trim();
    match mode {
        DateMode::Lexical if DATE_SHAPE.is_match(raw) => Ok(raw.to_string()),
        DateMode::Lexical => Err(FinanceError::validation(format!(
            "date must be in YYYY-MM-DD form: '{raw}'"
        ))),
        DateMode::Calendar => parse_calendar_date(raw)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .ok_or_else(|| FinanceError::validation(format!("not a valid calendar date: '{raw}'"))),
    }
}

/// Validate a budget month and return the value to store.
pub(crate) fn normalize_month(mode: DateMode, raw: &str) -> FinanceResult<String> {
    let raw = raw.trim();
    match mode {
        DateMode::Lexical if MONTH_SHAPE.is_match(raw) => Ok(raw.to_string()),
        DateMode::Lexical => Err(FinanceError::validation(format!(
            "month must be in YYYY-MM form: '{raw}'"
        ))),
        DateMode::Calendar => {
            let (year, month) = calendar_month(raw)?;
            Ok(format!("{year:04}-{month:02}"))
        }
    }
}

/// Year and month of a `YYYY-MM` value, checked against the calendar.
pub(crate) fn calendar_month(raw: &str) -> FinanceResult<(i32, u32)> {
    parse_calendar_date(&format!("{}-01", raw.trim()))
        .map(|d| (d.year(), d.month()))
        .ok_or_else(|| FinanceError::validation(format!("not a valid calendar month: '{raw}'")))
}

/// Whether a stored date string falls in the given calendar month. Rows whose
/// date does not parse never match.
pub(crate) fn date_in_month(date: &str, year: i32, month: u32) -> bool {
    parse_calendar_date(date).is_some_and(|d| d.year() == year && d.month() == month)
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `LIKE` pattern matching every string that starts with `prefix`.
pub(crate) fn like_prefix(prefix: &str) -> String {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}%")
}
