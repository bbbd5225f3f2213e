use std::path::Path;

use anyhow::{Context, Result};
use kebiao_core::KebiaoConfig;
use kebiao_core::cell::{CourseCell, parse_cell};
use kebiao_core::period::PeriodSlot;
use kebiao_core::schedule::{read_schedule, weekday_name};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::render::Render;

/// One non-empty cell and what the parser made of it.
#[derive(Serialize)]
pub struct CheckedCell {
    pub line: u64,
    pub period: Option<PeriodSlot>,
    pub weekday: &'static str,
    pub raw: String,
    pub parsed: Option<CourseCell>,
}

pub fn run(input: &Path, json: bool) -> Result<()> {
    let periods = KebiaoConfig::load()?.period_table()?;

    let csv = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let rows =
        read_schedule(&csv).with_context(|| format!("Failed to parse {}", input.display()))?;

    let mut checked = Vec::new();
    let mut lines = Vec::new();

    for row in &rows {
        let period = row.period().filter(|slot| periods.get(*slot).is_some());

        let header = match period.and_then(|slot| periods.get(slot).map(|time| (slot, time))) {
            Some((slot, time)) => format!("第{}节 {}", slot, time.to_string().dimmed()),
            None => format!(
                "{} {}",
                row.period_label.trim(),
                "(skipped: unknown period)".red()
            ),
        };
        lines.push(format!("{} {}", format!("Line {}", row.line).bold(), header));

        for (weekday, raw) in row.cells() {
            if raw.trim().is_empty() {
                continue;
            }

            let cell = CheckedCell {
                line: row.line,
                period,
                weekday: weekday_name(weekday),
                raw: raw.to_string(),
                parsed: parse_cell(raw),
            };
            lines.push(format!("   {}", cell.render()));
            checked.push(cell);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&checked)?);
        return Ok(());
    }

    if lines.is_empty() {
        println!("{}", "No rows found".dimmed());
        return Ok(());
    }

    for line in lines {
        println!("{}", line);
    }

    let without_weeks = checked
        .iter()
        .filter(|c| c.parsed.as_ref().is_none_or(|p| p.weeks.is_empty()))
        .count();
    if without_weeks > 0 {
        println!(
            "\n{}",
            format!("{} cell(s) produce no events", without_weeks).yellow()
        );
    }

    Ok(())
}
