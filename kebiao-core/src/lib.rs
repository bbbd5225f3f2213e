//! Core library for kebiao.
//!
//! Turns a university timetable exported as CSV into an iCalendar file:
//! - `cell` and `week` parse the free-form timetable cells
//! - `occurrence` dates each class meeting from the semester start
//! - `converter` drives a whole CSV through to a calendar document

pub mod cell;
pub mod config;
pub mod constants;
pub mod converter;
pub mod error;
pub mod ics;
pub mod occurrence;
pub mod output;
pub mod period;
pub mod schedule;
pub mod week;

pub use config::{ConvertConfig, KebiaoConfig};
pub use converter::{Conversion, ConvertStats, ScheduleConverter, convert};
pub use error::{KebiaoError, KebiaoResult};
