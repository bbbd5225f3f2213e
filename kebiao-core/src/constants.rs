//! Shared constants.

/// Default term length in weeks. Weeks past this are dropped from the output.
pub const DEFAULT_WEEK_COUNT: u32 = 20;

/// Highest week number a token or term may name. Larger ranges are typos.
pub const MAX_WEEK: u32 = 60;

/// Default class period times, slot 1 through 12.
pub const DEFAULT_PERIOD_TIMES: [(&str, &str); 12] = [
    ("08:00", "08:45"),
    ("08:50", "09:35"),
    ("09:55", "10:40"),
    ("10:45", "11:30"),
    ("11:35", "12:20"),
    ("14:00", "14:45"),
    ("14:50", "15:35"),
    ("15:55", "16:40"),
    ("16:45", "17:30"),
    ("18:40", "19:25"),
    ("19:30", "20:15"),
    ("20:20", "21:05"),
];

/// Suffix appended to every generated UID.
pub const UID_DOMAIN: &str = "kebiao";

pub const PRODID: &str = "-//kebiao//课程表//CN";

pub const DEFAULT_CALENDAR_NAME: &str = "课程表";
