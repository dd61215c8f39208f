//! Memory usage.

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::{PollResult, Provider, ProviderError};
use crate::ui::formatters::format_si;
use crate::utils::icons;

/// `used/total` RAM with SI prefixes.
pub struct MemoryProvider {
    system: System,
}

impl MemoryProvider {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram());
        Self {
            system: System::new_with_specifics(refresh_kind),
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for MemoryProvider {
    fn poll(&mut self) -> PollResult {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(ProviderError::unavailable("memory information"));
        }
        Ok(format_memory(self.system.used_memory(), total))
    }
}

fn format_memory(used: u64, total: u64) -> String {
    format!(
        "{} {}/{}",
        icons::RAM,
        format_si(used as f64),
        format_si(total as f64)
    )
}
