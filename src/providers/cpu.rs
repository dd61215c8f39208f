//! CPU load and temperature.

use std::path::PathBuf;
use std::time::Instant;

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::{read_number, PollResult, Provider, ProviderError};
use crate::ui::formatters::{paint, Color};
use crate::utils::icons;

const HOT_CELSIUS: i64 = 70;

/// Global CPU usage since the previous poll.
pub struct CpuProvider {
    system: System,
    last_refresh: Instant,
}

impl CpuProvider {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage());
        let system = System::new_with_specifics(refresh_kind);

        Self {
            system,
            last_refresh: Instant::now(),
        }
    }
}

impl Default for CpuProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for CpuProvider {
    fn poll(&mut self) -> PollResult {
        // sysinfo needs two samples at least this far apart to compute usage
        let elapsed = self.last_refresh.elapsed();
        if elapsed < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL - elapsed);
        }

        self.system.refresh_cpu_usage();
        self.last_refresh = Instant::now();

        let usage = self.system.global_cpu_usage();
        if !usage.is_finite() {
            return Err(ProviderError::parse("cpu usage is not a number"));
        }
        Ok(format!("{} {}%", icons::CPU, usage.round() as u32))
    }
}

/// Temperature of one thermal zone.
pub struct CpuTempProvider {
    path: PathBuf,
}

impl CpuTempProvider {
    pub fn new(thermal_zone: &str) -> Self {
        Self {
            path: PathBuf::from("/sys/devices/virtual/thermal")
                .join(thermal_zone)
                .join("temp"),
        }
    }
}

impl Provider for CpuTempProvider {
    fn poll(&mut self) -> PollResult {
        let millidegrees = read_number(&self.path)?;
        if millidegrees <= 0 {
            return Err(ProviderError::parse(format!(
                "{}: implausible temperature {}",
                self.path.display(),
                millidegrees
            )));
        }
        Ok(format_temperature(millidegrees / 1000))
    }
}

fn format_temperature(celsius: i64) -> String {
    if celsius >= HOT_CELSIUS {
        paint(Color::Red, &format!("{} {:02}°C", icons::TEMP_FIRE, celsius))
    } else {
        format!("{} {:02}°C", icons::TEMP, celsius)
    }
}
