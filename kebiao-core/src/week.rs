//! Week-range tokens.
//!
//! A token such as `3-16`, `3-16单` or `5-10双周` names an inclusive range of
//! teaching weeks, optionally restricted to odd or even weeks. Anything that
//! does not describe a usable range expands to an empty [`WeekSet`].

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::constants::MAX_WEEK;

const ODD_MARKER: char = '单';
const EVEN_MARKER: char = '双';

/// Odd/even restriction carried by a week token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    All,
    Odd,
    Even,
}

impl Parity {
    /// Detect the qualifier anywhere in the token. Odd wins if both appear.
    fn detect(token: &str) -> Self {
        if token.contains(ODD_MARKER) {
            Parity::Odd
        } else if token.contains(EVEN_MARKER) {
            Parity::Even
        } else {
            Parity::All
        }
    }

    fn admits(self, week: u32) -> bool {
        match self {
            Parity::All => true,
            Parity::Odd => week % 2 == 1,
            Parity::Even => week % 2 == 0,
        }
    }
}

/// A validated week range: `1 <= start <= end <= MAX_WEEK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSpec {
    pub start: u32,
    pub end: u32,
    pub parity: Parity,
}

impl WeekSpec {
    /// Parse a week token.
    ///
    /// The first two decimal digit runs are the start and end week; any
    /// further runs are ignored. Returns `None` when there are fewer than two
    /// runs, either bound is zero or past [`MAX_WEEK`], or the range is
    /// reversed (`16-3` is not reordered).
    pub fn parse(token: &str) -> Option<Self> {
        let mut runs = digit_runs(token);
        let start: u32 = runs.next()?.parse().ok()?;
        let end: u32 = runs.next()?.parse().ok()?;

        if start == 0 || start > end {
            return None;
        }
        if end > MAX_WEEK {
            tracing::debug!(token, end, "week range past the last possible week");
            return None;
        }

        Some(WeekSpec {
            start,
            end,
            parity: Parity::detect(token),
        })
    }

    /// The concrete weeks this range covers.
    pub fn weeks(&self) -> WeekSet {
        (self.start..=self.end)
            .filter(|w| self.parity.admits(*w))
            .collect()
    }
}

/// Iterate over maximal runs of ASCII digits in `s`.
fn digit_runs(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

/// Expand a week token into its weeks. Unparseable tokens give an empty set.
pub fn parse_weeks(token: &str) -> WeekSet {
    WeekSpec::parse(token)
        .map(|spec| spec.weeks())
        .unwrap_or_default()
}

/// An ordered set of teaching weeks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekSet(BTreeSet<u32>);

impl WeekSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, week: u32) -> bool {
        self.0.contains(&week)
    }

    /// Weeks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn union_with(&mut self, other: &WeekSet) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<u32> for WeekSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        WeekSet(iter.into_iter().collect())
    }
}

impl fmt::Display for WeekSet {
    /// Compact form: consecutive weeks collapse into ranges, e.g. `1-4,6,8-9`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut weeks = self.iter().peekable();
        let mut first = true;

        while let Some(start) = weeks.next() {
            let mut end = start;
            while weeks.peek() == Some(&(end + 1)) {
                end += 1;
                weeks.next();
            }

            if !first {
                f.write_str(",")?;
            }
            first = false;

            if start == end {
                write!(f, "{}", start)?;
            } else {
                write!(f, "{}-{}", start, end)?;
            }
        }

        Ok(())
    }
}
