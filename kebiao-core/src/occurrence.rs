//! Expanding parsed cells into dated class occurrences.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

use crate::cell::{CourseCell, format_summary};
use crate::constants::{DEFAULT_WEEK_COUNT, MAX_WEEK};
use crate::error::{KebiaoError, KebiaoResult};
use crate::period::{PeriodSlot, PeriodTime};

/// Monday of the first teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterAnchor(NaiveDate);

impl SemesterAnchor {
    pub fn new(date: NaiveDate) -> KebiaoResult<Self> {
        match date.weekday() {
            Weekday::Mon => Ok(SemesterAnchor(date)),
            weekday => Err(KebiaoError::InvalidAnchor { date, weekday }),
        }
    }

    /// Parse `YYYY-MM-DD`; the date must be a Monday.
    pub fn parse(s: &str) -> KebiaoResult<Self> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            KebiaoError::Config(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
        })?;
        Self::new(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Date of `weekday` in teaching week `week`.
    pub fn date_of(&self, week: u32, weekday: Weekday) -> Option<NaiveDate> {
        let offset = u64::from(weekday.num_days_from_monday())
            + u64::from(week.checked_sub(1)?) * 7;
        self.0.checked_add_days(Days::new(offset))
    }
}

impl From<SemesterAnchor> for NaiveDate {
    fn from(anchor: SemesterAnchor) -> Self {
        anchor.0
    }
}

impl fmt::Display for SemesterAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Teaching weeks that may appear in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBounds(RangeInclusive<u32>);

impl Default for WeekBounds {
    fn default() -> Self {
        WeekBounds(1..=DEFAULT_WEEK_COUNT)
    }
}

impl WeekBounds {
    /// Weeks `1..=count`.
    pub fn term_of(count: u32) -> KebiaoResult<Self> {
        if count == 0 {
            return Err(KebiaoError::Config("term length must be at least one week".into()));
        }
        if count > MAX_WEEK {
            return Err(KebiaoError::Config(format!(
                "term length {} exceeds the maximum of {} weeks",
                count, MAX_WEEK
            )));
        }
        Ok(WeekBounds(1..=count))
    }

    pub fn contains(&self, week: u32) -> bool {
        self.0.contains(&week)
    }

    pub fn last(&self) -> u32 {
        *self.0.end()
    }
}

/// One meeting of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub course: String,
    pub teacher: String,
    pub location: String,
    pub week: u32,
    pub weekday: Weekday,
    pub period: PeriodSlot,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn summary(&self) -> String {
        format_summary(&self.course, &self.teacher)
    }
}

/// Result of expanding one cell.
#[derive(Debug, Default)]
pub struct Expansion {
    pub occurrences: Vec<Occurrence>,
    /// Weeks the cell named that fall outside the term.
    pub dropped_weeks: Vec<u32>,
}

/// Materialise one occurrence per week of `cell`, in ascending week order.
/// Weeks outside `bounds` are dropped rather than reported as errors.
pub fn expand(
    cell: &CourseCell,
    slot: PeriodSlot,
    time: PeriodTime,
    weekday: Weekday,
    anchor: SemesterAnchor,
    bounds: &WeekBounds,
) -> Expansion {
    let mut expansion = Expansion::default();

    for week in cell.weeks.iter() {
        let date = match anchor.date_of(week, weekday) {
            Some(date) if bounds.contains(week) => date,
            _ => {
                expansion.dropped_weeks.push(week);
                continue;
            }
        };

        expansion.occurrences.push(Occurrence {
            course: cell.course.clone(),
            teacher: cell.teacher.clone(),
            location: cell.location.clone(),
            week,
            weekday,
            period: slot,
            start: date.and_time(time.start),
            end: date.and_time(time.end),
        });
    }

    if !expansion.dropped_weeks.is_empty() {
        tracing::debug!(
            course = %cell.course,
            weeks = ?expansion.dropped_weeks,
            "dropping weeks outside term"
        );
    }

    expansion
}
