//! Conversion settings.
//!
//! [`ConvertConfig`] is the immutable value a conversion runs with.
//! [`KebiaoConfig`] is the optional file at `~/.config/kebiao/config.toml`
//! that supplies defaults for it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CALENDAR_NAME, DEFAULT_PERIOD_TIMES, DEFAULT_WEEK_COUNT};
use crate::error::{KebiaoError, KebiaoResult};
use crate::ics::CalendarOptions;
use crate::occurrence::{SemesterAnchor, WeekBounds};
use crate::period::PeriodTable;

/// Everything a conversion needs besides the CSV itself.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub anchor: SemesterAnchor,
    pub periods: PeriodTable,
    pub weeks: WeekBounds,
    pub calendar: CalendarOptions,
}

impl ConvertConfig {
    /// Default period table, default term length, floating times.
    pub fn new(anchor: SemesterAnchor) -> Self {
        ConvertConfig {
            anchor,
            periods: PeriodTable::default(),
            weeks: WeekBounds::default(),
            calendar: CalendarOptions::default(),
        }
    }
}

/// Parse an IANA timezone name such as `Asia/Shanghai`.
pub fn parse_timezone(name: &str) -> KebiaoResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| KebiaoError::InvalidTimezone(name.to_string()))
}

/// Settings file at ~/.config/kebiao/config.toml. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct KebiaoConfig {
    /// Monday of week 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester_start: Option<NaiveDate>,

    /// Number of teaching weeks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_name: Option<String>,

    /// Replaces the default period table when present: slot -> "HH:MM-HH:MM".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub periods: BTreeMap<String, String>,
}

impl KebiaoConfig {
    pub fn config_path() -> KebiaoResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| KebiaoError::Config("Could not determine config directory".into()))?
            .join("kebiao");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the settings file, or defaults if it does not exist.
    pub fn load() -> KebiaoResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> KebiaoResult<Self> {
        if !path.exists() {
            return Ok(KebiaoConfig::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            KebiaoError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| KebiaoError::Config(format!("Could not parse {}: {e}", path.display())))
    }

    /// Build the period table, falling back to the default one.
    pub fn period_table(&self) -> KebiaoResult<PeriodTable> {
        if self.periods.is_empty() {
            return Ok(PeriodTable::default());
        }

        PeriodTable::from_entries(
            self.periods
                .iter()
                .map(|(slot, time)| (slot.as_str(), time.as_str())),
        )
    }

    pub fn week_bounds(&self) -> KebiaoResult<WeekBounds> {
        match self.weeks {
            Some(count) => WeekBounds::term_of(count),
            None => Ok(WeekBounds::default()),
        }
    }

    pub fn timezone(&self) -> KebiaoResult<Option<Tz>> {
        self.timezone.as_deref().map(parse_timezone).transpose()
    }

    /// Combine the file with the semester start to get a runnable config.
    pub fn to_convert_config(&self, anchor: SemesterAnchor) -> KebiaoResult<ConvertConfig> {
        Ok(ConvertConfig {
            anchor,
            periods: self.period_table()?,
            weeks: self.week_bounds()?,
            calendar: CalendarOptions {
                name: Some(
                    self.calendar_name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CALENDAR_NAME.to_string()),
                ),
                timezone: self.timezone()?,
            },
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> KebiaoResult<()> {
        let periods: String = DEFAULT_PERIOD_TIMES
            .iter()
            .zip(1..)
            .map(|((start, end), n)| format!("# {n} = \"{start}-{end}\"\n"))
            .collect();

        let contents = format!(
            "\
# kebiao configuration

# Monday of the first teaching week:
# semester_start = \"2025-02-17\"

# Number of teaching weeks (later weeks are dropped):
# weeks = {DEFAULT_WEEK_COUNT}

# Attach a timezone to event times (floating local time otherwise):
# timezone = \"Asia/Shanghai\"

# calendar_name = \"{DEFAULT_CALENDAR_NAME}\"

# Class period times. When present, this table replaces the default one.
# [periods]
{periods}"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KebiaoError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| KebiaoError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
