use std::path::PathBuf;

use anyhow::{Context, Result};
use kebiao_core::config::parse_timezone;
use kebiao_core::occurrence::WeekBounds;
use kebiao_core::output::default_output_path;
use kebiao_core::{KebiaoConfig, ScheduleConverter};
use owo_colors::OwoColorize;

use super::resolve_anchor;
use crate::render::Render;
use crate::utils::tui;

pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub start: Option<String>,
    pub weeks: Option<u32>,
    pub timezone: Option<String>,
    pub name: Option<String>,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let file_config = KebiaoConfig::load()?;
    let anchor = resolve_anchor(args.start.as_deref(), &file_config)?;

    // Command-line flags win over the config file
    let mut config = file_config.to_convert_config(anchor)?;
    if let Some(weeks) = args.weeks {
        config.weeks = WeekBounds::term_of(weeks)?;
    }
    if let Some(ref tz) = args.timezone {
        config.calendar.timezone = Some(parse_timezone(tz)?);
    }
    if let Some(name) = args.name {
        config.calendar.name = Some(name);
    }

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    let csv = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut converter = ScheduleConverter::new(&config);
    let rows = converter
        .read(&csv)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let len = u64::try_from(rows.len()).unwrap_or(u64::MAX);
    let bar = tui::create_progress_bar(len, "Converting".to_string());
    for row in &rows {
        converter.process_row(row);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let conversion = converter
        .finish_to(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", conversion.stats.render());

    if conversion.stats.events == 0 {
        println!(
            "{}",
            "No class occurrences found; the calendar is empty. Run `kebiao check` to see how cells were parsed."
                .yellow()
        );
    }

    println!(
        "{}",
        format!("Saved to {} (week 1 starts {})", output.display(), anchor).green()
    );

    Ok(())
}
