//! Currently playing title from mpv's JSON IPC socket.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{PollResult, Provider, ProviderError};
use crate::utils::icons;

const IPC_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct MpvReply {
    #[serde(default)]
    data: Value,
    error: String,
}

/// Extract the `data` field of an mpv reply as text.
pub fn parse_mpv_reply(line: &str) -> Result<String, ProviderError> {
    let reply: MpvReply = serde_json::from_str(line)?;
    if reply.error != "success" {
        return Err(ProviderError::parse(format!("mpv: {}", reply.error)));
    }
    match reply.data {
        Value::String(s) => Ok(s),
        Value::Null => Err(ProviderError::Empty),
        other => Ok(other.to_string()),
    }
}

pub struct MusicProvider {
    socket: PathBuf,
}

impl MusicProvider {
    pub fn new(socket: &str) -> Self {
        Self {
            socket: PathBuf::from(socket),
        }
    }

    fn query(&self, command: Value) -> Result<String, ProviderError> {
        let mut stream = UnixStream::connect(&self.socket)?;
        stream.set_read_timeout(Some(IPC_TIMEOUT))?;
        stream.set_write_timeout(Some(IPC_TIMEOUT))?;

        let mut request = json!({ "command": command }).to_string();
        request.push('\n');
        stream.write_all(request.as_bytes())?;

        // mpv may interleave event notifications; the reply is the line with "error"
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let line = line?;
            if line.contains("\"error\"") {
                return parse_mpv_reply(&line);
            }
        }
        Err(ProviderError::Empty)
    }
}

impl Provider for MusicProvider {
    fn poll(&mut self) -> PollResult {
        let paused = self.query(json!(["get_property_string", "pause"]))? == "yes";
        let title = self.query(json!(["get_property", "media-title"]))?;

        let icon = if paused {
            icons::MUSIC_PAUSE
        } else {
            icons::MUSIC_PLAY
        };
        Ok(format!("{} {}", icon, title))
    }
}
