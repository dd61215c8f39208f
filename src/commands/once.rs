use crate::core::{poll_once, ConfigSource};
use crate::providers::builtin_registry;
use crate::ui::strip_markers;
use anyhow::{Context, Result};

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let source = ConfigSource::from_arg(matches.get_one::<String>("config").map(String::as_str));
    let config = source
        .load()
        .with_context(|| format!("Failed to load configuration from {}", source.describe()))?;

    let mut registry = builtin_registry();
    config.apply_to(&mut registry);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let snapshot =
        runtime.block_on(poll_once(&registry, &config.providers, &config.delimiter));

    if matches.get_flag("plain") {
        println!("{}", strip_markers(&snapshot.text));
    } else {
        println!("{}", snapshot.text);
    }
    Ok(())
}
