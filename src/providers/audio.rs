//! PipeWire volume and microphone state through `wpctl`.
//!
//! Both blocks default to interval 0: they are refreshed by a trigger from
//! whatever changes the volume (a key binding running `sb trigger volume`).

use super::{exec_command, PollResult, Provider, ProviderError};
use crate::ui::formatters::{paint, Color};
use crate::utils::icons;

/// Parsed `wpctl get-volume` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WpctlVolume {
    pub percent: u32,
    pub muted: bool,
}

/// Parse a line such as `Volume: 0.45 [MUTED]`.
pub fn parse_wpctl(line: &str) -> Result<WpctlVolume, ProviderError> {
    let rest = line
        .trim()
        .strip_prefix("Volume:")
        .ok_or_else(|| ProviderError::parse(format!("unexpected wpctl output: {}", line)))?;

    let level = rest
        .split_whitespace()
        .next()
        .and_then(|v| v.parse::<f32>().ok())
        .ok_or_else(|| ProviderError::parse(format!("no volume level in: {}", line)))?;

    Ok(WpctlVolume {
        percent: (level * 100.0).round() as u32,
        muted: rest.contains("MUTED"),
    })
}

pub struct VolumeProvider {
    command: String,
}

impl VolumeProvider {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Provider for VolumeProvider {
    fn poll(&mut self) -> PollResult {
        let volume = parse_wpctl(&exec_command(&self.command)?)?;
        Ok(format_volume(volume))
    }
}

fn format_volume(volume: WpctlVolume) -> String {
    if volume.muted {
        paint(Color::Cyan, &format!("{} {}%", icons::VOL_MUTE, volume.percent))
    } else {
        format!("{} {}%", icons::VOL_ON, volume.percent)
    }
}

pub struct MicProvider {
    command: String,
}

impl MicProvider {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Provider for MicProvider {
    fn poll(&mut self) -> PollResult {
        let volume = parse_wpctl(&exec_command(&self.command)?)?;
        if volume.muted {
            Ok(paint(Color::Orange, icons::MIC_OFF))
        } else {
            Ok(icons::MIC_ON.to_string())
        }
    }
}
