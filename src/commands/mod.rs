pub mod check;
pub mod config;
pub mod convert;

use std::io::IsTerminal;

use anyhow::Result;
use dialoguer::Input;
use kebiao_core::KebiaoConfig;
use kebiao_core::occurrence::SemesterAnchor;

/// Semester start from the command line, then the config file, then an
/// interactive prompt when stdin is a terminal.
pub fn resolve_anchor(start: Option<&str>, config: &KebiaoConfig) -> Result<SemesterAnchor> {
    if let Some(start) = start {
        return Ok(SemesterAnchor::parse(start)?);
    }

    if let Some(date) = config.semester_start {
        return Ok(SemesterAnchor::new(date)?);
    }

    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "No semester start date.\n\n\
            Pass the Monday of the first teaching week:\n  \
            kebiao convert <INPUT> --start 2025-02-17\n\n\
            or set semester_start in the config file (see `kebiao config`)."
        );
    }

    prompt_anchor()
}

fn prompt_anchor() -> Result<SemesterAnchor> {
    let input: String = Input::new()
        .with_prompt("  Monday of week 1 (YYYY-MM-DD)")
        .validate_with(|input: &String| -> Result<(), String> {
            SemesterAnchor::parse(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let anchor = SemesterAnchor::parse(&input)?;
    tracing::debug!(%anchor, "semester start from prompt");
    Ok(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_command_line_start_wins() {
        let config = KebiaoConfig {
            semester_start: NaiveDate::from_ymd_opt(2024, 9, 2),
            ..Default::default()
        };
        let anchor = resolve_anchor(Some("2025-02-17"), &config).unwrap();
        assert_eq!(anchor.to_string(), "2025-02-17");
    }

    #[test]
    fn test_config_start_is_used() {
        let config = KebiaoConfig {
            semester_start: NaiveDate::from_ymd_opt(2024, 9, 2),
            ..Default::default()
        };
        let anchor = resolve_anchor(None, &config).unwrap();
        assert_eq!(anchor.to_string(), "2024-09-02");
    }

    #[test]
    fn test_non_monday_start_is_rejected() {
        let err = resolve_anchor(Some("2025-02-18"), &KebiaoConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Monday"), "got: {}", err);

        let config = KebiaoConfig {
            semester_start: NaiveDate::from_ymd_opt(2024, 9, 3),
            ..Default::default()
        };
        assert!(resolve_anchor(None, &config).is_err());
    }
}
