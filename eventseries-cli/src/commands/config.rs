use std::path::Path;

use anyhow::Result;
use eventseries_core::GenerationLimits;
use owo_colors::OwoColorize;

pub fn run(config_path: Option<&Path>, init: bool) -> Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => GenerationLimits::config_path()?,
    };

    if init {
        if path.exists() {
            println!("{}", format!("  Config already exists: {}", path.display()).dimmed());
        } else {
            GenerationLimits::create_default_config(&path)?;
            println!("{}", format!("  Created: {}", path.display()).green());
        }
    }

    let source = if path.exists() { Some(path.as_path()) } else { None };
    let limits = GenerationLimits::load(source)?;

    println!("{}", "Paths".bold());
    println!("  Config:                   {}", path.display());
    println!();
    println!("{}", "Limits".bold());
    println!("  camp_max_scan_days:       {}", limits.camp_max_scan_days);
    println!("  max_occurrences:          {}", limits.max_occurrences);
    println!("  default_horizon_weeks:    {}", limits.default_horizon_weeks);
    println!("  weekly_iteration_factor:  {}", limits.weekly_iteration_factor);

    Ok(())
}
