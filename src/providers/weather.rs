//! One-line weather from wttr.in.

use std::time::Duration;

use super::{PollResult, Provider, ProviderError};
use crate::core::aggregator::OUTPUT_MAX;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Squeeze wttr.in's `format=1` line: drop padding, keep one space before the sign.
///
/// Returns `None` when the result would not fit in a fragment.
pub fn compact_weather(raw: &str) -> Option<String> {
    let mut out = String::new();
    for c in raw.chars() {
        match c {
            ' ' => continue,
            '\n' => break,
            '+' | '-' => {
                out.push(' ');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if out.is_empty() || out.len() >= OUTPUT_MAX {
        None
    } else {
        Some(out)
    }
}

pub struct WeatherProvider {
    url: String,
}

impl WeatherProvider {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

impl Provider for WeatherProvider {
    fn poll(&mut self) -> PollResult {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        let body = client.get(&self.url).send()?.error_for_status()?.text()?;

        compact_weather(&body)
            .ok_or_else(|| ProviderError::parse(format!("unusable weather line: {:?}", body)))
    }
}
