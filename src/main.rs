mod commands;
mod logging;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kebiao")]
#[command(about = "Convert a university timetable CSV into an iCalendar file")]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a timetable CSV into an .ics file
    Convert {
        /// Timetable CSV (UTF-8)
        input: PathBuf,

        /// Output file (defaults to the input path with an .ics extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Monday of the first teaching week (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// Number of teaching weeks; later weeks are dropped
        #[arg(short, long)]
        weeks: Option<u32>,

        /// IANA timezone for event times (e.g. "Asia/Shanghai")
        #[arg(long)]
        timezone: Option<String>,

        /// Calendar display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show how each timetable cell is parsed, without writing anything
    Check {
        /// Timetable CSV (UTF-8)
        input: PathBuf,

        /// Print parsed cells as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location and effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            start,
            weeks,
            timezone,
            name,
        } => commands::convert::run(commands::convert::ConvertArgs {
            input,
            output,
            start,
            weeks,
            timezone,
            name,
        }),
        Commands::Check { input, json } => commands::check::run(&input, json),
        Commands::Config => commands::config::run(),
    }
}
