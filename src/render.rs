//! TUI rendering traits for kebiao types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to kebiao-core types using owo_colors.

use kebiao_core::ConvertStats;
use owo_colors::OwoColorize;

use crate::commands::check::CheckedCell;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ConvertStats {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} from {} {}",
            "Created".bold(),
            pluralize_count(self.events, "event").green(),
            self.rows,
            pluralize("row", self.rows)
        )];

        if self.skipped_rows > 0 {
            lines.push(format!(
                "   {}",
                format!(
                    "{} skipped (no known period)",
                    pluralize_count(self.skipped_rows, "row")
                )
                .dimmed()
            ));
        }
        if self.cells_without_weeks > 0 {
            lines.push(format!(
                "   {}",
                format!(
                    "{} without readable weeks",
                    pluralize_count(self.cells_without_weeks, "cell")
                )
                .yellow()
            ));
        }
        if self.dropped_weeks > 0 {
            lines.push(format!(
                "   {}",
                format!(
                    "{} outside the term dropped",
                    pluralize_count(self.dropped_weeks, "week")
                )
                .yellow()
            ));
        }

        lines.join("\n")
    }
}

impl Render for CheckedCell {
    fn render(&self) -> String {
        let Some(ref cell) = self.parsed else {
            return format!("{} {}", self.weekday, "(unparsed)".red());
        };

        let weeks = if cell.weeks.is_empty() {
            "no weeks".red().to_string()
        } else {
            format!("weeks {}", cell.weeks).cyan().to_string()
        };

        let mut line = format!("{} {} {}", self.weekday, cell.summary(), weeks);
        if !cell.location.is_empty() {
            line.push_str(&format!(" @ {}", cell.location).dimmed().to_string());
        }
        line
    }
}

fn pluralize_count(n: usize, word: &str) -> String {
    format!("{} {}", n, pluralize(word, n))
}

/// Simple pluralization: adds "s" if count != 1
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
