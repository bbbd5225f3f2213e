//! ICS generation.
//!
//! This module turns class occurrences into an RFC 5545 calendar document.

mod generate;

pub use generate::{CalendarOptions, generate_calendar};
