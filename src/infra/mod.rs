//! File formats around the estimating domain: CSV, JSON and quote sheets.

pub mod csv;
pub mod json;
pub mod quote_sheet;

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub use json::QuoteDocument;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing `{0}` column header")]
    MissingHeader(String),
    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("file contains no sections")]
    NoSections,
}

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Today's date in `YYYY-MM-DD` form (UTC).
pub fn today() -> String {
    format_date(OffsetDateTime::now_utc().date())
}

pub fn format_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

/// Parses a `YYYY-MM-DD` date, returning `None` for anything else.
pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), ISO_DATE).ok()
}
