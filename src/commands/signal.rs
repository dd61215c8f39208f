use crate::error::SbError;
use crate::providers::builtin_registry;
use anyhow::{bail, Context, Result};
use colored::Colorize;

/// `sb trigger <name>`: refresh one block in every running instance.
pub fn trigger(matches: &clap::ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .context("Block name is required")?;

    let registry = builtin_registry();
    let index = registry
        .index_of(name)
        .ok_or_else(|| SbError::unknown_block(name.as_str()))?;

    send(trigger_signal(index)?, &format!("trigger '{}'", name))
}

/// `sb reload`: make every running instance re-read its configuration.
pub fn reload(_matches: &clap::ArgMatches) -> Result<()> {
    send(restart_signal(), "reload")
}

#[cfg(unix)]
fn trigger_signal(index: usize) -> Result<i32> {
    crate::platform::trigger_signal(index)
        .ok_or_else(|| SbError::signal(format!("no real-time signal for block {}", index)).into())
}

#[cfg(unix)]
fn restart_signal() -> i32 {
    libc::SIGUSR1
}

#[cfg(unix)]
fn send(sig: i32, what: &str) -> Result<()> {
    let sent = crate::platform::send_to_running(sig)?;
    if sent == 0 {
        bail!("No running sb instance found");
    }
    println!(
        "{} Sent {} to {} instance(s)",
        "✓".green(),
        what.bold(),
        sent
    );
    Ok(())
}

#[cfg(not(unix))]
fn trigger_signal(_index: usize) -> Result<i32> {
    bail!("Signals are only supported on Unix")
}

#[cfg(not(unix))]
fn restart_signal() -> i32 {
    0
}

#[cfg(not(unix))]
fn send(_sig: i32, _what: &str) -> Result<()> {
    bail!("Signals are only supported on Unix")
}
