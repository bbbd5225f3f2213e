//! CSV to calendar conversion.
//!
//! [`convert`] is the one-shot entry point. [`ScheduleConverter`] exposes the
//! same work row by row so a caller can report progress or stop between rows.

use std::path::Path;

use crate::cell::parse_cell;
use crate::config::ConvertConfig;
use crate::error::KebiaoResult;
use crate::ics::generate_calendar;
use crate::occurrence::{Occurrence, expand};
use crate::output::write_atomic;
use crate::schedule::{ScheduleRow, read_schedule};

/// Where a conversion run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Idle,
    Reading,
    Converting,
    Serializing,
    Done,
    Failed,
}

/// Counters for one run. Nothing here is an error; they describe what was
/// skipped along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub rows: usize,
    /// Rows whose period label is missing or not in the period table.
    pub skipped_rows: usize,
    /// Non-empty cells that parsed into a course.
    pub cells: usize,
    /// Parsed cells with no usable week data.
    pub cells_without_weeks: usize,
    /// Weeks named by cells but outside the term.
    pub dropped_weeks: usize,
    pub events: usize,
}

/// Finished output of a run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Complete iCalendar document.
    pub ics: String,
    pub occurrences: Vec<Occurrence>,
    pub stats: ConvertStats,
}

pub struct ScheduleConverter<'a> {
    config: &'a ConvertConfig,
    occurrences: Vec<Occurrence>,
    stats: ConvertStats,
    state: ConversionState,
}

impl<'a> ScheduleConverter<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        ScheduleConverter {
            config,
            occurrences: Vec::new(),
            stats: ConvertStats::default(),
            state: ConversionState::Idle,
        }
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn stats(&self) -> ConvertStats {
        self.stats
    }

    /// Parse the CSV into rows. A read failure moves the converter to
    /// [`ConversionState::Failed`].
    pub fn read(&mut self, csv: &[u8]) -> KebiaoResult<Vec<ScheduleRow>> {
        self.state = ConversionState::Reading;

        match read_schedule(csv) {
            Ok(rows) => {
                self.state = ConversionState::Converting;
                Ok(rows)
            }
            Err(e) => {
                self.state = ConversionState::Failed;
                Err(e)
            }
        }
    }

    /// Expand every cell of one row. Returns how many occurrences it added.
    /// Unusable rows and cells add nothing.
    pub fn process_row(&mut self, row: &ScheduleRow) -> usize {
        self.state = ConversionState::Converting;
        self.stats.rows += 1;

        let Some((slot, time)) = row
            .period()
            .and_then(|slot| self.config.periods.get(slot).map(|time| (slot, time)))
        else {
            tracing::debug!(line = row.line, label = %row.period_label, "skipping row without known period");
            self.stats.skipped_rows += 1;
            return 0;
        };

        let before = self.occurrences.len();

        for (weekday, raw) in row.cells() {
            let Some(cell) = parse_cell(raw) else {
                continue;
            };
            self.stats.cells += 1;

            if cell.weeks.is_empty() {
                tracing::debug!(line = row.line, %weekday, raw, "no usable weeks in cell");
                self.stats.cells_without_weeks += 1;
                continue;
            }

            let expansion = expand(
                &cell,
                slot,
                time,
                weekday,
                self.config.anchor,
                &self.config.weeks,
            );
            self.stats.dropped_weeks += expansion.dropped_weeks.len();
            self.occurrences.extend(expansion.occurrences);
        }

        let added = self.occurrences.len() - before;
        self.stats.events += added;
        added
    }

    /// Serialize everything collected so far into one calendar document.
    /// The collected occurrences move into the returned [`Conversion`].
    pub fn finish(&mut self) -> Conversion {
        self.state = ConversionState::Serializing;
        let conversion = self.serialize();
        self.state = ConversionState::Done;
        conversion
    }

    /// Like [`finish`](Self::finish), then write the calendar to `path`
    /// atomically. A failed write moves the converter to
    /// [`ConversionState::Failed`] and leaves `path` untouched.
    pub fn finish_to(&mut self, path: &Path) -> KebiaoResult<Conversion> {
        self.state = ConversionState::Serializing;
        let conversion = self.serialize();

        match write_atomic(path, &conversion.ics) {
            Ok(()) => {
                self.state = ConversionState::Done;
                Ok(conversion)
            }
            Err(e) => {
                self.state = ConversionState::Failed;
                Err(e)
            }
        }
    }

    fn serialize(&mut self) -> Conversion {
        let ics = generate_calendar(&self.occurrences, &self.config.calendar);

        tracing::info!(
            rows = self.stats.rows,
            skipped_rows = self.stats.skipped_rows,
            events = self.stats.events,
            "conversion finished"
        );

        Conversion {
            ics,
            occurrences: std::mem::take(&mut self.occurrences),
            stats: self.stats,
        }
    }
}

/// Convert CSV bytes into a calendar in one go.
pub fn convert(csv: &[u8], config: &ConvertConfig) -> KebiaoResult<Conversion> {
    let mut converter = ScheduleConverter::new(config);
    let rows = converter.read(csv)?;

    for row in &rows {
        converter.process_row(row);
    }

    Ok(converter.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KebiaoError;
    use crate::occurrence::{SemesterAnchor, WeekBounds};

    const HEADER: &str = "节次,星期一,星期二,星期三,星期四,星期五,星期六,星期日\n";

    fn config() -> ConvertConfig {
        ConvertConfig::new(SemesterAnchor::parse("2025-02-17").unwrap())
    }

    #[test]
    fn test_single_cell_end_to_end() {
        let csv = format!("{HEADER}1,高等数学 李四(1-2 B203),,,,,,\n");
        let conversion = convert(csv.as_bytes(), &config()).unwrap();

        assert_eq!(conversion.stats.events, 2);
        assert_eq!(conversion.ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(conversion.ics.contains("DTSTART:20250217T080000"));
        assert!(conversion.ics.contains("DTSTART:20250224T080000"));
        assert!(conversion.ics.contains("DTEND:20250224T084500"));
    }

    #[test]
    fn test_skips_rows_without_known_period() {
        let csv = format!(
            "{HEADER}午休,数学 甲(1-2 X),,,,,,\n\
             13,数学 甲(1-2 X),,,,,,\n\
             2,数学 甲(1-2 X),,,,,,\n"
        );
        let conversion = convert(csv.as_bytes(), &config()).unwrap();

        assert_eq!(conversion.stats.rows, 3);
        assert_eq!(conversion.stats.skipped_rows, 2);
        assert_eq!(conversion.stats.events, 2);
    }

    #[test]
    fn test_cells_without_weeks_produce_no_events() {
        let csv = format!("{HEADER}1,线性代数 周九(A101),,,,,,\n");
        let conversion = convert(csv.as_bytes(), &config()).unwrap();

        assert_eq!(conversion.stats.cells, 1);
        assert_eq!(conversion.stats.cells_without_weeks, 1);
        assert_eq!(conversion.stats.events, 0);
        assert!(!conversion.ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_out_of_term_weeks_are_counted() {
        let mut config = config();
        config.weeks = WeekBounds::term_of(16).unwrap();
        let csv = format!("{HEADER}1,,毕业设计 王一(15-18 实验室),,,,,\n");
        let conversion = convert(csv.as_bytes(), &config).unwrap();

        assert_eq!(conversion.stats.events, 2);
        assert_eq!(conversion.stats.dropped_weeks, 2);
    }

    #[test]
    fn test_state_transitions() {
        let config = config();
        let mut converter = ScheduleConverter::new(&config);
        assert_eq!(converter.state(), ConversionState::Idle);

        let csv = format!("{HEADER}1,数学 甲(1-3 X),,,,,,\n");
        let rows = converter.read(csv.as_bytes()).unwrap();
        assert_eq!(converter.state(), ConversionState::Converting);

        assert_eq!(converter.process_row(&rows[0]), 3);
        assert_eq!(converter.stats().events, 3);

        let conversion = converter.finish();
        assert_eq!(conversion.occurrences.len(), 3);
        assert_eq!(converter.state(), ConversionState::Done);
    }

    #[test]
    fn test_finish_to_writes_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("课程表.ics");
        let config = config();
        let mut converter = ScheduleConverter::new(&config);

        let csv = format!("{HEADER}1,数学 甲(1-2 X),,,,,,\n");
        for row in converter.read(csv.as_bytes()).unwrap() {
            converter.process_row(&row);
        }

        let conversion = converter.finish_to(&path).unwrap();
        assert_eq!(converter.state(), ConversionState::Done);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), conversion.ics);
    }

    #[test]
    fn test_write_failure_moves_to_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("课程表.ics");
        let config = config();
        let mut converter = ScheduleConverter::new(&config);

        let err = converter.finish_to(&path).unwrap_err();
        assert!(matches!(err, KebiaoError::Io(_)), "unexpected error: {err}");
        assert_eq!(converter.state(), ConversionState::Failed);
        assert!(!path.exists());
    }

    #[test]
    fn test_read_failure_moves_to_failed() {
        let config = config();
        let mut converter = ScheduleConverter::new(&config);
        let err = converter.read("星期一\nx\n".as_bytes()).unwrap_err();
        assert!(matches!(err, KebiaoError::MissingColumn(_)));
        assert_eq!(converter.state(), ConversionState::Failed);
    }

    #[test]
    fn test_occurrences_follow_row_then_weekday_order() {
        let csv = format!(
            "{HEADER}1,甲 A(1-1 X),乙 B(1-1 Y),,,,,\n\
             2,丙 C(1-1 Z),,,,,,\n"
        );
        let conversion = convert(csv.as_bytes(), &config()).unwrap();
        let courses: Vec<&str> = conversion
            .occurrences
            .iter()
            .map(|o| o.course.as_str())
            .collect();
        assert_eq!(courses, vec!["甲", "乙", "丙"]);
    }
}
