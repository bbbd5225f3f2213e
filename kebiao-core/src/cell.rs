//! Timetable cell grammar.
//!
//! A cell packs a whole class into one string:
//!
//! ```text
//! 数据结构 张三(3-16周 A101)
//! ^course  ^teacher ^weeks ^location
//! ```
//!
//! Parsing runs in three steps, each with an explicit no-match outcome:
//! bracket split, course/teacher split, then a scan of the bracket payload
//! for week tokens. Whatever the scan leaves behind is the location.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::week::{WeekSet, parse_weeks};

/// Week tokens inside the bracket payload: `3-16`, `3-16单`, `第1-8双周`, `1～4周`.
/// Only ASCII digits count as week numbers.
static WEEK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第?[0-9]+[-－~～][0-9]+[单双]?周?").unwrap());

const OPEN_BRACKETS: [char; 2] = ['(', '（'];
const CLOSE_BRACKETS: [char; 2] = [')', '）'];

/// Characters that separate leftover location fragments besides whitespace.
const LIST_SEPARATORS: [char; 5] = [',', '，', '、', ';', '；'];

/// One class parsed out of a timetable cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCell {
    pub course: String,
    /// Empty when the cell names no teacher.
    pub teacher: String,
    /// Empty when no week token could be read; such a cell yields no events.
    pub weeks: WeekSet,
    pub location: String,
}

impl CourseCell {
    /// Event summary: `"<course> - <teacher>"`, or just the course.
    pub fn summary(&self) -> String {
        format_summary(&self.course, &self.teacher)
    }
}

pub(crate) fn format_summary(course: &str, teacher: &str) -> String {
    if teacher.is_empty() {
        course.to_string()
    } else {
        format!("{} - {}", course, teacher)
    }
}

/// Parse a raw cell. Returns `None` for blank cells and cells without a
/// course name.
pub fn parse_cell(raw: &str) -> Option<CourseCell> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (main, bracket) = split_bracket(raw);
    let (course, teacher) = split_course_teacher(main)?;

    let (weeks, location) = match bracket {
        Some(payload) => scan_payload(payload),
        None => (WeekSet::new(), String::new()),
    };

    Some(CourseCell {
        course: course.to_string(),
        teacher: teacher.to_string(),
        weeks,
        location,
    })
}

/// Split at the first opening bracket. The payload ends at the next closing
/// bracket (or the end of the cell if it is never closed); anything after
/// that is dropped.
fn split_bracket(cell: &str) -> (&str, Option<&str>) {
    let Some(open) = cell.find(OPEN_BRACKETS) else {
        return (cell, None);
    };

    let main = &cell[..open];
    // Both bracket styles are a single char; skip whichever one matched.
    let rest = &cell[open..];
    let rest = &rest[rest.chars().next().map_or(0, char::len_utf8)..];

    let payload = match rest.find(CLOSE_BRACKETS) {
        Some(close) => &rest[..close],
        None => rest,
    };

    (main, Some(payload))
}

/// The last whitespace-delimited word is the teacher, the rest the course.
fn split_course_teacher(main: &str) -> Option<(&str, &str)> {
    let main = main.trim();
    if main.is_empty() {
        return None;
    }

    match main.rsplit_once(char::is_whitespace) {
        Some((course, teacher)) => Some((course.trim(), teacher.trim())),
        None => Some((main, "")),
    }
}

/// Pull every week token out of the payload and union their weeks; the
/// remaining fragments, single-space joined, are the location.
///
/// A match glued to a preceding ASCII letter or digit is part of a room
/// number (`A1-101`) and stays in the location. Tokens may follow each
/// other directly, as in `1-8周9-16周`.
fn scan_payload(payload: &str) -> (WeekSet, String) {
    let mut weeks = WeekSet::new();
    let mut leftover = String::with_capacity(payload.len());
    let mut rest = 0;

    for token in WEEK_TOKEN.find_iter(payload) {
        let glued = payload[..token.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        if glued {
            continue;
        }

        weeks.union_with(&parse_weeks(token.as_str()));
        leftover.push_str(&payload[rest..token.start()]);
        leftover.push(' ');
        rest = token.end();
    }
    leftover.push_str(&payload[rest..]);

    let location = leftover
        .split(|c: char| c.is_whitespace() || LIST_SEPARATORS.contains(&c))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (weeks, location)
}
