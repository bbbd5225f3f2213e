//! Error types for kebiao.
//!
//! Only run-level failures live here. A cell, row or week token that cannot be
//! parsed is not an error: it contributes zero occurrences and is counted in
//! [`crate::converter::ConvertStats`].

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

/// Errors that abort a conversion run.
#[derive(Error, Debug)]
pub enum KebiaoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Semester start {date} is a {weekday}, expected a Monday")]
    InvalidAnchor { date: NaiveDate, weekday: Weekday },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid period time for slot {slot}: '{value}' (expected HH:MM-HH:MM)")]
    InvalidPeriodTime { slot: String, value: String },

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("CSV error{line}: {0}", line = csv_line(.0))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn csv_line(err: &csv::Error) -> String {
    err.position()
        .map(|pos| format!(" on line {}", pos.line()))
        .unwrap_or_default()
}

/// Result type alias for kebiao operations.
pub type KebiaoResult<T> = Result<T, KebiaoError>;
