//! Built-in status providers.
//!
//! A provider is the leaf of the system: it samples one piece of system state
//! and renders it as a short text fragment. Providers may block (file reads,
//! subprocesses, sockets, HTTP); the scheduler always runs them on the blocking
//! thread pool.

mod audio;
mod battery;
mod clock;
mod cpu;
mod memory;
mod music;
mod network;
mod news;
mod weather;

pub use audio::{parse_wpctl, MicProvider, VolumeProvider, WpctlVolume};
pub use battery::{battery_icon, BatteryProvider, BatteryStatus};
pub use clock::{day_percent, DateProvider, DayPercentProvider, TimeProvider};
pub use cpu::{CpuProvider, CpuTempProvider};
pub use memory::MemoryProvider;
pub use music::{parse_mpv_reply, MusicProvider};
pub use network::{parse_wireless_quality, LocalIpProvider, NetSpeedProvider, PublicIpProvider, WifiProvider};
pub use news::{parse_unread, NewsProvider};
pub use weather::{compact_weather, WeatherProvider};

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use thiserror::Error;

use crate::core::block::{Block, BlockRegistry};

/// Errors a provider can report for a single poll.
///
/// None of these are fatal: the block keeps its previous fragment and tries
/// again on its next tick or trigger.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} unavailable")]
    Unavailable(String),

    #[error("provider produced no output")]
    Empty,
}

impl ProviderError {
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ProviderError::Parse(msg.into())
    }

    pub fn unavailable<S: Into<String>>(what: S) -> Self {
        ProviderError::Unavailable(what.into())
    }
}

/// Outcome of one provider invocation.
pub type PollResult = std::result::Result<String, ProviderError>;

/// A source of status text.
pub trait Provider: Send {
    /// Sample the source once and render it.
    fn poll(&mut self) -> PollResult;
}

impl<F> Provider for F
where
    F: FnMut() -> PollResult + Send,
{
    fn poll(&mut self) -> PollResult {
        self()
    }
}

/// Builds a fresh provider instance for a session.
pub type ProviderFactory = Arc<dyn Fn(&ProviderSettings) -> Box<dyn Provider> + Send + Sync>;

/// Wrap a constructor into a [`ProviderFactory`].
pub fn factory<P, F>(build: F) -> ProviderFactory
where
    P: Provider + 'static,
    F: Fn(&ProviderSettings) -> P + Send + Sync + 'static,
{
    Arc::new(move |settings: &ProviderSettings| Box::new(build(settings)) as Box<dyn Provider>)
}

/// Machine-specific knobs for the built-in providers (`[providers]` table).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub battery: String,
    pub eth_interface: String,
    pub wifi_interface: String,
    pub thermal_zone: String,
    pub mpv_socket: String,
    pub public_ip_url: String,
    pub weather_url: String,
    pub news_command: String,
    pub volume_command: String,
    pub mic_command: String,
    /// Enable `notify-send` warnings for low/full battery
    pub notify: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            battery: "BAT0".to_string(),
            eth_interface: "eth0".to_string(),
            wifi_interface: "wlan0".to_string(),
            thermal_zone: "thermal_zone0".to_string(),
            mpv_socket: "/tmp/mpvsocket".to_string(),
            public_ip_url: "https://ifconfig.me".to_string(),
            weather_url: "https://wttr.in?format=1".to_string(),
            news_command: "newsboat -x print-unread".to_string(),
            volume_command: "wpctl get-volume @DEFAULT_AUDIO_SINK@".to_string(),
            mic_command: "wpctl get-volume @DEFAULT_AUDIO_SOURCE@".to_string(),
            notify: true,
        }
    }
}

/// The compiled-in block list, in display order.
pub fn builtin_registry() -> BlockRegistry {
    BlockRegistry::new(vec![
        Block::new("music", false, 0, factory(|s| MusicProvider::new(&s.mpv_socket))),
        Block::new("cputemp", false, 10, factory(|s| CpuTempProvider::new(&s.thermal_zone))),
        Block::new("cpu", false, 10, factory(|_| CpuProvider::new())),
        Block::new("memory", false, 10, factory(|_| MemoryProvider::new())),
        Block::new("battery", false, 30, factory(|s| BatteryProvider::new(&s.battery, s.notify))),
        Block::new("wifi", false, 10, factory(|s| WifiProvider::new(&s.wifi_interface))),
        Block::new("netspeed", false, 1, factory(NetSpeedProvider::new)),
        Block::new("localip", false, 3600, factory(LocalIpProvider::new)),
        Block::new("publicip", false, 3600, factory(|s| PublicIpProvider::new(&s.public_ip_url))),
        Block::new("volume", false, 0, factory(|s| VolumeProvider::new(&s.volume_command))),
        Block::new("mic", false, 0, factory(|s| MicProvider::new(&s.mic_command))),
        Block::new("news", false, 3600, factory(|s| NewsProvider::new(&s.news_command))),
        Block::new("weather", false, 18000, factory(|s| WeatherProvider::new(&s.weather_url))),
        Block::new("daypercent", false, 1800, factory(|_| DayPercentProvider)),
        Block::new("date", false, 3600, factory(|_| DateProvider)),
        Block::new("time", true, 60, factory(|_| TimeProvider)),
    ])
}

/// Read the first line of a file, without the trailing newline.
pub(crate) fn read_line(path: impl AsRef<Path>) -> Result<String, ProviderError> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(content.lines().next().unwrap_or_default().trim().to_string())
}

/// Read a file holding a single integer (sysfs style).
pub(crate) fn read_number(path: impl AsRef<Path>) -> Result<i64, ProviderError> {
    let path = path.as_ref();
    let line = read_line(path)?;
    line.parse::<i64>()
        .map_err(|e| ProviderError::parse(format!("{}: {}", path.display(), e)))
}

/// Run a shell command and return the first line of its output.
pub(crate) fn exec_command(command: &str) -> Result<String, ProviderError> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|e| ProviderError::Command {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next() {
        Some(line) if !line.trim().is_empty() => Ok(line.trim_end().to_string()),
        _ => Err(ProviderError::Command {
            command: command.to_string(),
            reason: format!("no output ({})", output.status),
        }),
    }
}
