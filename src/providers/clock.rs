//! Time-of-day providers.

use chrono::{Local, Timelike};

use super::{PollResult, Provider};
use crate::ui::formatters::{paint, Color};
use crate::utils::icons;

/// `HH:MM`, orange late in the evening and red in the small hours.
pub struct TimeProvider;

impl Provider for TimeProvider {
    fn poll(&mut self) -> PollResult {
        let now = Local::now();
        Ok(format_time(now.hour(), now.minute()))
    }
}

fn format_time(hour: u32, minute: u32) -> String {
    let text = format!("{} {:02}:{:02}", icons::CLOCK, hour, minute);
    if hour >= 22 {
        paint(Color::Orange, &text)
    } else if hour <= 5 {
        paint(Color::Red, &text)
    } else {
        text
    }
}

/// `Mon 01 (Tue)` style date.
pub struct DateProvider;

impl Provider for DateProvider {
    fn poll(&mut self) -> PollResult {
        Ok(format!(
            "{} {}",
            icons::CALENDAR,
            Local::now().format("%b %d (%a)")
        ))
    }
}

/// How much of the local day has gone by.
pub struct DayPercentProvider;

impl Provider for DayPercentProvider {
    fn poll(&mut self) -> PollResult {
        let now = Local::now();
        Ok(format!(
            "{} {}%",
            icons::TOUCHGRASS,
            day_percent(now.hour(), now.minute())
        ))
    }
}

/// Percentage of the day elapsed at `hour:minute`, rounded down.
pub fn day_percent(hour: u32, minute: u32) -> u32 {
    ((hour * 60 + minute) * 100) / (60 * 24)
}
