//! Unread feed count from newsboat.

use super::{exec_command, PollResult, Provider, ProviderError};
use crate::utils::icons;

/// Parse `newsboat -x print-unread` output (`12 unread articles`).
pub fn parse_unread(line: &str) -> Result<u32, ProviderError> {
    // newsboat prints "Error: ..." when another instance holds the lock
    if line.starts_with('E') {
        return Err(ProviderError::parse(line.to_string()));
    }
    line.split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| ProviderError::parse(format!("unexpected newsboat output: {}", line)))
}

pub struct NewsProvider {
    command: String,
}

impl NewsProvider {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Provider for NewsProvider {
    fn poll(&mut self) -> PollResult {
        let unread = parse_unread(&exec_command(&self.command)?)?;
        Ok(format!("{} {}", icons::NEWSPAPER, unread))
    }
}
