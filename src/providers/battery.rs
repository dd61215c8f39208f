//! Battery charge from sysfs.

use std::path::PathBuf;
use std::process::Command;

use super::{read_line, read_number, PollResult, Provider, ProviderError};
use crate::ui::formatters::Color;
use crate::utils::icons;

const LOW_CAPACITY: u8 = 15;
const FULL_CAPACITY: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatus {
    Charging,
    Discharging,
}

impl BatteryStatus {
    fn from_sysfs(status: &str) -> Self {
        if status.trim() == "Charging" {
            BatteryStatus::Charging
        } else {
            BatteryStatus::Discharging
        }
    }
}

/// Which notification was sent last, so each threshold crossing notifies once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notified {
    None,
    Low,
    Full,
}

pub struct BatteryProvider {
    capacity_path: PathBuf,
    status_path: PathBuf,
    notify: bool,
    notified: Notified,
}

impl BatteryProvider {
    pub fn new(battery: &str, notify: bool) -> Self {
        let base = PathBuf::from("/sys/class/power_supply").join(battery);
        Self {
            capacity_path: base.join("capacity"),
            status_path: base.join("status"),
            notify,
            notified: Notified::None,
        }
    }

    fn maybe_notify(&mut self, capacity: u8, status: BatteryStatus) {
        let wanted = match status {
            BatteryStatus::Charging if capacity >= FULL_CAPACITY => Notified::Full,
            BatteryStatus::Discharging if capacity <= LOW_CAPACITY => Notified::Low,
            _ => Notified::None,
        };

        if wanted != Notified::None && wanted != self.notified && self.notify {
            let message = match wanted {
                Notified::Full => format!("{} Battery full", icons::BATTERY_FULL_CHARGED),
                _ => format!("{} Battery low", icons::BATTERY[1]),
            };
            if let Err(e) = run_notifier("notify-send", &message) {
                log::warn!("Notification not shown: {}", e);
            }
        }
        self.notified = wanted;
    }
}

/// Run `program message` to completion so the child is always reaped.
fn run_notifier(program: &str, message: &str) -> Result<(), ProviderError> {
    let failed = |reason: String| ProviderError::Command {
        command: program.to_string(),
        reason,
    };
    let status = Command::new(program)
        .arg(message)
        .status()
        .map_err(|e| failed(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(failed(status.to_string()))
    }
}

impl Provider for BatteryProvider {
    fn poll(&mut self) -> PollResult {
        let capacity = read_number(&self.capacity_path)?;
        let capacity = u8::try_from(capacity.clamp(0, 100))
            .map_err(|e| ProviderError::parse(e.to_string()))?;
        let status = BatteryStatus::from_sysfs(&read_line(&self.status_path)?);

        self.maybe_notify(capacity, status);
        Ok(format_battery(capacity, status))
    }
}

/// Glyph for a charge level; charging glyphs occupy the second half of the table.
pub fn battery_icon(capacity: u8, status: BatteryStatus) -> &'static str {
    let level = usize::from(capacity.min(100) / 10);
    match status {
        BatteryStatus::Discharging => icons::BATTERY[level],
        BatteryStatus::Charging => icons::BATTERY[icons::BATTERY.len() / 2 + level],
    }
}

fn capacity_color(capacity: u8, status: BatteryStatus) -> Option<Color> {
    if capacity >= 90 {
        return Some(Color::Green);
    }
    match status {
        // Resets the yellow charging prefix for the level
        BatteryStatus::Charging => Some(Color::Norm),
        BatteryStatus::Discharging => match capacity {
            30..=39 => Some(Color::Yellow),
            20..=29 => Some(Color::Orange),
            0..=19 => Some(Color::Red),
            _ => None,
        },
    }
}

fn format_battery(capacity: u8, status: BatteryStatus) -> String {
    let prefix = match status {
        BatteryStatus::Charging => Color::Yellow.marker(),
        BatteryStatus::Discharging => "",
    };
    let color = capacity_color(capacity, status).map_or("", Color::marker);

    format!(
        "{}{} {}{}%{}",
        prefix,
        battery_icon(capacity, status),
        color,
        capacity,
        Color::Norm.marker()
    )
}
