use anyhow::Result;
use kebiao_core::KebiaoConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = KebiaoConfig::config_path()?;

    if !config_path.exists() {
        KebiaoConfig::create_default_config(&config_path)?;
        println!(
            "{}",
            format!("Created default config at {}", config_path.display()).green()
        );
    }

    let config = KebiaoConfig::load_from(&config_path)?;
    let periods = config.period_table()?;
    let weeks = config.week_bounds()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());

    println!("\n{}", "Settings".bold());
    println!(
        "  Semester start: {}",
        config
            .semester_start
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "(ask when converting)".dimmed().to_string())
    );
    println!("  Weeks:          1-{}", weeks.last());
    println!(
        "  Timezone:       {}",
        config
            .timezone()?
            .map(|tz| tz.name().to_string())
            .unwrap_or_else(|| "(floating local time)".dimmed().to_string())
    );
    if let Some(ref name) = config.calendar_name {
        println!("  Calendar name:  {}", name);
    }

    println!("\n{}", "Periods".bold());
    for (slot, time) in periods.iter() {
        println!("  {:>2}  {}", slot, time);
    }

    Ok(())
}
