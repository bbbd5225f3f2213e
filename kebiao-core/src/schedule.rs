//! Reading the timetable CSV.
//!
//! The export has one row per class period. One column holds the period
//! label (`节次`), seven more hold the cells for Monday through Sunday.
//! Columns are located by header name, so their order does not matter.

use chrono::Weekday;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{KebiaoError, KebiaoResult};
use crate::period::PeriodSlot;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Monday first, matching column order in the usual export.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Recognised weekday headers, indexed from Monday.
const WEEKDAY_HEADERS: [&[&str]; 7] = [
    &["星期一", "周一", "monday", "mon"],
    &["星期二", "周二", "tuesday", "tue"],
    &["星期三", "周三", "wednesday", "wed"],
    &["星期四", "周四", "thursday", "thu"],
    &["星期五", "周五", "friday", "fri"],
    &["星期六", "周六", "saturday", "sat"],
    &["星期日", "星期天", "周日", "周天", "sunday", "sun"],
];

const PERIOD_HEADERS: [&str; 2] = ["节次", "period"];

/// Chinese weekday name as used in the export headers.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_HEADERS[weekday.num_days_from_monday() as usize][0]
}

fn weekday_from_header(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    WEEKDAY_HEADERS
        .iter()
        .position(|aliases| aliases.contains(&name.as_str()))
        .map(|i| WEEKDAYS[i])
}

fn is_period_header(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    PERIOD_HEADERS.iter().any(|h| name.contains(h))
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleHeader {
    period: usize,
    weekdays: [Option<usize>; 7],
}

impl ScheduleHeader {
    /// Locate the period and weekday columns. Blank and duplicate headers are
    /// tolerated; the first matching column wins.
    pub fn resolve(headers: &StringRecord) -> KebiaoResult<Self> {
        let mut period = None;
        let mut weekdays = [None; 7];

        for (idx, name) in headers.iter().enumerate() {
            if let Some(weekday) = weekday_from_header(name) {
                let slot = &mut weekdays[weekday.num_days_from_monday() as usize];
                slot.get_or_insert(idx);
            } else if period.is_none() && is_period_header(name) {
                period = Some(idx);
            }
        }

        let period = period.ok_or_else(|| KebiaoError::MissingColumn("节次 (period)".into()))?;

        if weekdays.iter().all(Option::is_none) {
            return Err(KebiaoError::MissingColumn("星期一..星期日 (weekdays)".into()));
        }

        for (weekday, column) in WEEKDAYS.iter().zip(&weekdays) {
            if column.is_none() {
                tracing::warn!(%weekday, "no column for weekday, treating it as empty");
            }
        }

        Ok(ScheduleHeader { period, weekdays })
    }

    fn row(&self, line: u64, record: &StringRecord) -> ScheduleRow {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        ScheduleRow {
            line,
            period_label: field(Some(self.period)),
            cells: self.weekdays.map(field),
        }
    }
}

/// One data row: a period label and the seven weekday cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub period_label: String,
    cells: [String; 7],
}

impl ScheduleRow {
    pub fn new(line: u64, period_label: impl Into<String>, cells: [String; 7]) -> Self {
        ScheduleRow {
            line,
            period_label: period_label.into(),
            cells,
        }
    }

    /// Period slot named by the label, if it has a leading number.
    pub fn period(&self) -> Option<PeriodSlot> {
        PeriodSlot::from_label(&self.period_label)
    }

    pub fn cell(&self, weekday: Weekday) -> &str {
        &self.cells[weekday.num_days_from_monday() as usize]
    }

    /// Raw cells paired with their weekday, Monday first.
    pub fn cells(&self) -> impl Iterator<Item = (Weekday, &str)> {
        WEEKDAYS.iter().copied().zip(self.cells.iter().map(String::as_str))
    }
}

/// Parse the whole CSV into rows. The input must be UTF-8; a leading
/// byte-order mark is skipped.
pub fn read_schedule(csv: &[u8]) -> KebiaoResult<Vec<ScheduleRow>> {
    let csv = csv.strip_prefix(UTF8_BOM).unwrap_or(csv);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv);

    let header = ScheduleHeader::resolve(reader.headers()?)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        rows.push(header.row(line, &record));
    }

    tracing::debug!(rows = rows.len(), "read schedule");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_standard_export() {
        let csv = "节次,星期一,星期二,星期三,星期四,星期五,星期六,星期日\n\
                   1,高等数学 李四(1-2 B203),,,,,,\n\
                   2,,大学英语 王五(1-16 A1),,,,,\n";

        let rows = read_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period(), PeriodSlot::new(1));
        assert_eq!(rows[0].cell(Weekday::Mon), "高等数学 李四(1-2 B203)");
        assert_eq!(rows[0].cell(Weekday::Tue), "");
        assert_eq!(rows[1].cell(Weekday::Tue), "大学英语 王五(1-16 A1)");
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_bom_and_padded_headers() {
        let csv = "\u{feff} 节次 , 星期一 ,星期二\n1,数学 甲(1-2 X),\n";
        let rows = read_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].period_label, "1");
        assert_eq!(rows[0].cell(Weekday::Mon), "数学 甲(1-2 X)");
        assert_eq!(rows[0].cell(Weekday::Sun), "", "missing column reads as empty");
    }

    #[test]
    fn test_column_order_is_free() {
        let csv = "星期三,,节次,星期一,星期一\nC,,4,A,B\n";
        let rows = read_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].period(), PeriodSlot::new(4));
        assert_eq!(rows[0].cell(Weekday::Wed), "C");
        assert_eq!(rows[0].cell(Weekday::Mon), "A", "first duplicate wins");
    }

    #[test]
    fn test_ragged_rows() {
        let csv = "节次,星期一,星期二\n1\n2,x 甲(1-2 Y),z 乙(3-4 W),extra\n";
        let rows = read_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].cell(Weekday::Mon), "");
        assert_eq!(rows[1].cell(Weekday::Tue), "z 乙(3-4 W)");
    }

    #[test]
    fn test_english_headers() {
        let csv = "Period,Monday,Tue\n5,课 师(1-3 R),\n";
        let rows = read_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].period(), PeriodSlot::new(5));
        assert_eq!(rows[0].cell(Weekday::Mon), "课 师(1-3 R)");
    }

    #[test]
    fn test_missing_period_column() {
        let err = read_schedule("星期一,星期二\nx,y\n".as_bytes()).unwrap_err();
        assert!(matches!(err, KebiaoError::MissingColumn(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_weekday_columns() {
        let err = read_schedule("节次,备注\n1,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, KebiaoError::MissingColumn(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_invalid_utf8_is_a_csv_error() {
        let mut csv = b"\xE8\x8A\x82\xE6\xAC\xA1,\xE6\x98\x9F\xE6\x9C\x9F\xE4\xB8\x80\n1,".to_vec();
        csv.extend_from_slice(b"\xFF\xFE\n");
        let err = read_schedule(&csv).unwrap_err();
        assert!(matches!(err, KebiaoError::Csv(_)), "unexpected error: {err}");
        assert!(err.to_string().contains("line 2"), "got: {err}");
        assert!(std::error::Error::source(&err).is_some(), "csv cause is kept");
    }

    #[test]
    fn test_cells_iterate_monday_first() {
        let row = ScheduleRow::new(
            2,
            "1",
            ["a", "b", "c", "d", "e", "f", "g"].map(String::from),
        );
        let weekdays: Vec<Weekday> = row.cells().map(|(w, _)| w).collect();
        assert_eq!(weekdays, WEEKDAYS.to_vec());
        assert_eq!(row.cell(Weekday::Sun), "g");
    }
}
