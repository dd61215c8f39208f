use crate::core::ConfigSource;
use crate::providers::builtin_registry;
use anyhow::{Context, Result};
use colored::*;
use std::time::Duration;

fn format_interval(interval: Duration) -> String {
    match interval.as_secs() {
        0 if interval.is_zero() => "trigger".to_string(),
        0 => format!("{}ms", interval.as_millis()),
        secs if secs % 3600 == 0 => format!("{}h", secs / 3600),
        secs if secs % 60 == 0 => format!("{}m", secs / 60),
        secs => format!("{}s", secs),
    }
}

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let source = ConfigSource::from_arg(matches.get_one::<String>("config").map(String::as_str));
    let config = source
        .load()
        .with_context(|| format!("Failed to load configuration from {}", source.describe()))?;

    let mut registry = builtin_registry();
    config.apply_to(&mut registry);

    println!("{}", format!("Blocks ({})", source.describe()).bold());
    println!(
        "{}",
        format!("{:>3}  {:<12} {:<10} {:<9} {}", "#", "NAME", "SIGNAL", "INTERVAL", "STATE").dimmed()
    );

    for (index, block) in registry.iter().enumerate() {
        let state = if block.is_enabled() {
            "on".green().bold()
        } else {
            "off".bright_black()
        };
        println!(
            "{:>3}  {} {:<10} {:<9} {}",
            index,
            format!("{:<12}", block.name()).cyan(),
            format!("RTMIN+{}", index),
            format_interval(block.interval()),
            state
        );
    }

    Ok(())
}
