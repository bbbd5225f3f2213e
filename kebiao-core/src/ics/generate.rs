//! ICS file generation.

use chrono::{NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};
use uuid::Uuid;

use crate::constants::{PRODID, UID_DOMAIN};
use crate::occurrence::Occurrence;
use crate::schedule::weekday_name;

/// Calendar-level settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarOptions {
    /// Display name (X-WR-CALNAME).
    pub name: Option<String>,
    /// When set, DTSTART/DTEND carry this TZID and the calendar gets a
    /// matching VTIMEZONE; otherwise times are floating.
    pub timezone: Option<Tz>,
}

/// Generate a complete calendar with one VEVENT per occurrence.
pub fn generate_calendar(occurrences: &[Occurrence], options: &CalendarOptions) -> String {
    let mut cal = Calendar::new();

    if let Some(ref name) = options.name {
        cal.name(name);
    }
    if let Some(tz) = options.timezone {
        cal.timezone(tz.name());
    }

    // One DTSTAMP for the whole run
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let tzid = options.timezone.map(|tz| tz.name());

    for occurrence in occurrences {
        cal.push(build_event(occurrence, &dtstamp, tzid));
    }

    let cal = cal.done();
    let mut ics = strip_ics_bloat(&cal.to_string());

    if let Some(tz) = options.timezone {
        let at = ics
            .find("\r\nBEGIN:VEVENT\r\n")
            .or_else(|| ics.find("\r\nEND:VCALENDAR"))
            .map_or(ics.len(), |i| i + 2);
        ics.insert_str(at, &vtimezone(tz, occurrences));
    }

    ics
}

/// VTIMEZONE for `tz`. Each UTC offset in use becomes one observance whose
/// onset is the first occurrence that falls under it, which is enough to
/// resolve every event in this calendar.
fn vtimezone(tz: Tz, occurrences: &[Occurrence]) -> String {
    let mut starts: Vec<NaiveDateTime> = occurrences.iter().map(|o| o.start).collect();
    starts.sort();

    let mut observances: Vec<(NaiveDateTime, i32)> = Vec::new();
    for start in starts {
        let Some(offset) = tz.offset_from_local_datetime(&start).earliest() else {
            continue;
        };
        let seconds = offset.fix().local_minus_utc();
        if observances.last().is_none_or(|(_, last)| *last != seconds) {
            observances.push((start, seconds));
        }
    }
    if observances.is_empty() {
        let now = Utc::now().naive_utc();
        let seconds = tz.offset_from_utc_datetime(&now).fix().local_minus_utc();
        observances.push((now, seconds));
    }

    let mut out = format!("BEGIN:VTIMEZONE\r\nTZID:{}\r\n", tz.name());
    let mut from = observances[0].1;
    for (onset, to) in observances {
        out.push_str("BEGIN:STANDARD\r\n");
        out.push_str(&format!("DTSTART:{}\r\n", onset.format("%Y%m%dT%H%M%S")));
        out.push_str(&format!("TZOFFSETFROM:{}\r\n", format_utc_offset(from)));
        out.push_str(&format!("TZOFFSETTO:{}\r\n", format_utc_offset(to)));
        out.push_str("END:STANDARD\r\n");
        from = to;
    }
    out.push_str("END:VTIMEZONE\r\n");
    out
}

/// `+0800`, `-0430`.
fn format_utc_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}

fn build_event(occurrence: &Occurrence, dtstamp: &str, tzid: Option<&str>) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&new_uid());
    ics_event.summary(&occurrence.summary());
    ics_event.add_property("DTSTAMP", dtstamp);

    add_datetime_property(&mut ics_event, "DTSTART", &occurrence.start, tzid);
    add_datetime_property(&mut ics_event, "DTEND", &occurrence.end, tzid);

    if !occurrence.location.is_empty() {
        ics_event.location(&occurrence.location);
    }

    ics_event.description(&describe(occurrence));

    ics_event.done()
}

/// Fresh UID. Every occurrence gets its own, so the same class in different
/// weeks, weekdays or periods never collides.
fn new_uid() -> String {
    format!("{}@{}", Uuid::new_v4(), UID_DOMAIN)
}

/// e.g. `第3周 星期一 第1节` followed by the teacher on its own line.
fn describe(occurrence: &Occurrence) -> String {
    let mut description = format!(
        "第{}周 {} 第{}节",
        occurrence.week,
        weekday_name(occurrence.weekday),
        occurrence.period
    );

    if !occurrence.teacher.is_empty() {
        description.push_str("\n教师：");
        description.push_str(&occurrence.teacher);
    }

    description
}

/// Add a local datetime, floating unless a TZID is given.
fn add_datetime_property(
    ics_event: &mut icalendar::Event,
    name: &str,
    datetime: &NaiveDateTime,
    tzid: Option<&str>,
) {
    let value = datetime.format("%Y%m%dT%H%M%S").to_string();
    match tzid {
        Some(tzid) => {
            let mut prop = Property::new(name, value);
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
        None => {
            ics_event.add_property(name, value);
        }
    }
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
