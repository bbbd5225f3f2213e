//! Class periods and their clock times.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use crate::constants::DEFAULT_PERIOD_TIMES;
use crate::error::{KebiaoError, KebiaoResult};

/// Ordinal class period within a day, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PeriodSlot(u8);

impl PeriodSlot {
    pub fn new(n: u8) -> Option<Self> {
        (n >= 1).then_some(PeriodSlot(n))
    }

    /// Read the slot from a period label such as `1`, `1(08:00-08:45)` or
    /// `10节`: the leading run of digits, after surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let end = label
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(label.len());
        label[..end].parse().ok().and_then(Self::new)
    }
}

impl fmt::Display for PeriodSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Start and end clock time of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTime {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PeriodTime {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(PeriodTime { start, end })
    }

    /// Parse `HH:MM-HH:MM`. Whitespace around either time is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let (start, end) = s.split_once('-')?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
        Self::new(start, end)
    }
}

impl fmt::Display for PeriodTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Lookup from period slot to clock times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodTable {
    times: BTreeMap<PeriodSlot, PeriodTime>,
}

impl Default for PeriodTable {
    /// The standard twelve-period day.
    fn default() -> Self {
        let times = DEFAULT_PERIOD_TIMES
            .iter()
            .zip(1u8..)
            .filter_map(|((start, end), n)| {
                let time = PeriodTime::parse(&format!("{}-{}", start, end))?;
                Some((PeriodSlot(n), time))
            })
            .collect();

        PeriodTable { times }
    }
}

impl PeriodTable {
    /// Build a table from `slot -> "HH:MM-HH:MM"` pairs, as found in the
    /// `[periods]` section of the config file.
    pub fn from_entries<'a, I>(entries: I) -> KebiaoResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut times = BTreeMap::new();

        for (slot, value) in entries {
            let invalid = || KebiaoError::InvalidPeriodTime {
                slot: slot.to_string(),
                value: value.to_string(),
            };

            let n: u8 = slot.trim().parse().map_err(|_| invalid())?;
            let slot = PeriodSlot::new(n).ok_or_else(invalid)?;
            let time = PeriodTime::parse(value).ok_or_else(invalid)?;
            times.insert(slot, time);
        }

        if times.is_empty() {
            return Err(KebiaoError::Config("period table is empty".into()));
        }

        Ok(PeriodTable { times })
    }

    pub fn get(&self, slot: PeriodSlot) -> Option<PeriodTime> {
        self.times.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PeriodSlot, PeriodTime)> + '_ {
        self.times.iter().map(|(slot, time)| (*slot, *time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_table_has_twelve_periods() {
        let table = PeriodTable::default();
        assert_eq!(table.len(), 12);

        let first = table.get(PeriodSlot::new(1).unwrap()).unwrap();
        assert_eq!(first.start, hm(8, 0));
        assert_eq!(first.end, hm(8, 45));

        let last = table.get(PeriodSlot::new(12).unwrap()).unwrap();
        assert_eq!(last.to_string(), "20:20-21:05");

        assert_eq!(table.get(PeriodSlot::new(13).unwrap()), None);
    }

    #[test]
    fn test_slot_from_label() {
        assert_eq!(PeriodSlot::from_label("1"), PeriodSlot::new(1));
        assert_eq!(PeriodSlot::from_label(" 10 "), PeriodSlot::new(10));
        assert_eq!(PeriodSlot::from_label("3(09:55-10:40)"), PeriodSlot::new(3));
        assert_eq!(PeriodSlot::from_label("11节"), PeriodSlot::new(11));
        assert_eq!(PeriodSlot::from_label("第1节"), None);
        assert_eq!(PeriodSlot::from_label("午休"), None);
        assert_eq!(PeriodSlot::from_label(""), None);
        assert_eq!(PeriodSlot::from_label("0"), None);
        assert_eq!(PeriodSlot::from_label("300"), None);
    }

    #[test]
    fn test_period_time_parse() {
        let time = PeriodTime::parse("08:50 - 09:35").unwrap();
        assert_eq!(time.start, hm(8, 50));
        assert_eq!(time.end, hm(9, 35));

        assert_eq!(PeriodTime::parse("09:35-08:50"), None, "end before start");
        assert_eq!(PeriodTime::parse("08:50"), None);
        assert_eq!(PeriodTime::parse("8h-9h"), None);
    }

    #[test]
    fn test_table_from_entries() {
        let table =
            PeriodTable::from_entries([("1", "07:30-08:15"), ("2", "08:20-09:05")]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(PeriodSlot::new(2).unwrap()).unwrap().to_string(),
            "08:20-09:05"
        );
    }

    #[test]
    fn test_table_from_entries_rejects_bad_values() {
        let err = PeriodTable::from_entries([("1", "late")]).unwrap_err();
        assert!(
            matches!(err, KebiaoError::InvalidPeriodTime { ref slot, .. } if slot == "1"),
            "unexpected error: {err}"
        );

        assert!(PeriodTable::from_entries([("x", "08:00-08:45")]).is_err());
        assert!(PeriodTable::from_entries([("0", "08:00-08:45")]).is_err());
        assert!(PeriodTable::from_entries(std::iter::empty()).is_err());
    }
}
