//! Network providers: wifi link, throughput, local and public addresses.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use sysinfo::Networks;

use super::{exec_command, read_line, PollResult, Provider, ProviderError, ProviderSettings};
use crate::ui::formatters::format_si;
use crate::utils::icons;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn operstate_path(interface: &str) -> PathBuf {
    PathBuf::from("/sys/class/net").join(interface).join("operstate")
}

fn interface_is_up(interface: &str) -> bool {
    matches!(read_line(operstate_path(interface)), Ok(state) if state == "up")
}

/// Link quality (0-70 scale) of `interface` from `/proc/net/wireless` content.
pub fn parse_wireless_quality(content: &str, interface: &str) -> Option<u32> {
    let prefix = format!("{}:", interface);
    let line = content
        .lines()
        .find(|line| line.trim_start().starts_with(&prefix))?;

    // status, then link quality (e.g. "54.")
    let link = line.trim_start()[prefix.len()..].split_whitespace().nth(1)?;
    link.trim_end_matches('.').parse::<f32>().ok().map(|q| q as u32)
}

/// SSID and signal strength of the wireless interface.
pub struct WifiProvider {
    interface: String,
}

impl WifiProvider {
    pub fn new(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
        }
    }
}

impl Provider for WifiProvider {
    fn poll(&mut self) -> PollResult {
        if !interface_is_up(&self.interface) {
            return Ok(icons::WIFI_DOWN.to_string());
        }

        let wireless = fs::read_to_string("/proc/net/wireless")?;
        let link = parse_wireless_quality(&wireless, &self.interface).ok_or_else(|| {
            ProviderError::parse(format!("{} missing from /proc/net/wireless", self.interface))
        })?;
        let quality = link * 100 / 70;

        let ssid = exec_command(&format!("iwgetid -r {}", self.interface))?;

        let icon = if quality >= 70 {
            icons::WIFI_FULL
        } else if quality >= 30 {
            icons::WIFI_AVG
        } else {
            icons::WIFI_BAD
        };
        Ok(format!("{} {}", icon, ssid))
    }
}

/// Receive/transmit rate of the active interface.
pub struct NetSpeedProvider {
    networks: Networks,
    wifi_interface: String,
    eth_interface: String,
    interface: Option<String>,
    last: Option<(Instant, u64, u64)>,
}

impl NetSpeedProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            wifi_interface: settings.wifi_interface.clone(),
            eth_interface: settings.eth_interface.clone(),
            interface: None,
            last: None,
        }
    }

    /// Wifi when it is up at first poll, ethernet otherwise.
    fn interface(&mut self) -> String {
        let wifi = &self.wifi_interface;
        let eth = &self.eth_interface;
        self.interface
            .get_or_insert_with(|| {
                if interface_is_up(wifi) {
                    wifi.clone()
                } else {
                    eth.clone()
                }
            })
            .clone()
    }
}

impl Provider for NetSpeedProvider {
    fn poll(&mut self) -> PollResult {
        let interface = self.interface();
        self.networks.refresh(true);

        let data = self
            .networks
            .list()
            .get(&interface)
            .ok_or_else(|| ProviderError::unavailable(format!("interface {}", interface)))?;
        let (rx, tx) = (data.total_received(), data.total_transmitted());
        let now = Instant::now();

        let previous = self.last.replace((now, rx, tx));
        let (then, prev_rx, prev_tx) =
            previous.ok_or_else(|| ProviderError::unavailable("netspeed baseline"))?;

        let elapsed = now.duration_since(then).as_secs_f64().max(f64::EPSILON);
        let rx_rate = rx.saturating_sub(prev_rx) as f64 / elapsed;
        let tx_rate = tx.saturating_sub(prev_tx) as f64 / elapsed;

        Ok(format!(
            "{} {} {} {}",
            icons::ARROW_DOWN,
            format_si(rx_rate),
            icons::ARROW_UP,
            format_si(tx_rate)
        ))
    }
}

/// First IPv4 address of the ethernet or wifi interface.
pub struct LocalIpProvider {
    networks: Networks,
    interfaces: [String; 2],
}

impl LocalIpProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            interfaces: [settings.eth_interface.clone(), settings.wifi_interface.clone()],
        }
    }
}

impl Provider for LocalIpProvider {
    fn poll(&mut self) -> PollResult {
        self.networks.refresh(true);

        let list = self.networks.list();
        let address = self
            .interfaces
            .iter()
            .filter_map(|name| list.get(name))
            .flat_map(|data| data.ip_networks().iter())
            .find_map(|network| match network.addr {
                IpAddr::V4(addr) => Some(addr),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| ProviderError::unavailable("IPv4 address"))?;

        Ok(format!("{} {}", icons::NETWORK, address))
    }
}

/// Address as seen from the internet.
pub struct PublicIpProvider {
    url: String,
}

impl PublicIpProvider {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

impl Provider for PublicIpProvider {
    fn poll(&mut self) -> PollResult {
        // The blocking client owns a runtime; keep its whole lifetime on this thread.
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        let body = client.get(&self.url).send()?.error_for_status()?.text()?;

        let address = body.trim();
        if address.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(format!("{} {}", icons::PERSON, address))
    }
}
