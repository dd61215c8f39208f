//! Render sinks: where the composed status ends up.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use parking_lot::Mutex;

use crate::error::{Result, SbError};

/// Destination for the composed status.
///
/// Implementations may block; they are always called outside the aggregator lock.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, status: &str) -> Result<()>;

    /// Blank the display on shutdown.
    fn clear(&self) -> Result<()> {
        self.set_status("")
    }
}

/// Which sink the daemon should render to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    X11,
    Stdout,
}

impl FromStr for SinkKind {
    type Err = SbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x11" | "xsetroot" => Ok(SinkKind::X11),
            "stdout" => Ok(SinkKind::Stdout),
            other => Err(SbError::config(format!("unknown sink '{}'", other))),
        }
    }
}

/// Open the requested sink; fails if its display resource is unavailable.
pub fn open_sink(kind: SinkKind) -> Result<Box<dyn StatusSink>> {
    match kind {
        SinkKind::X11 => Ok(Box::new(XRootSink::connect()?)),
        SinkKind::Stdout => Ok(Box::new(StdoutSink::default())),
    }
}

/// Sets the X11 root window name, which dwm-like window managers show as status.
#[derive(Debug)]
pub struct XRootSink {
    xsetroot: PathBuf,
}

impl XRootSink {
    pub fn connect() -> Result<Self> {
        Self::locate(env::var("DISPLAY").ok().as_deref(), "xsetroot")
    }

    /// Resolve `program` for `display` without touching the root window.
    fn locate(display: Option<&str>, program: &str) -> Result<Self> {
        match display {
            Some(display) if !display.is_empty() => {}
            _ => return Err(SbError::display_unavailable("DISPLAY is not set")),
        }

        let xsetroot = which::which(program).map_err(|e| {
            SbError::display_unavailable(format!("{} not found: {}", program, e))
        })?;

        Ok(Self { xsetroot })
    }
}

impl StatusSink for XRootSink {
    fn set_status(&self, status: &str) -> Result<()> {
        let exit = Command::new(&self.xsetroot)
            .arg("-name")
            .arg(status)
            .status()?;
        if exit.success() {
            Ok(())
        } else {
            Err(SbError::render(format!("xsetroot exited with {}", exit)))
        }
    }
}

/// One line per status on stdout, for bars that read a pipe.
#[derive(Debug, Default)]
pub struct StdoutSink {
    lock: Mutex<()>,
}

impl StatusSink for StdoutSink {
    fn set_status(&self, status: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", status)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keeps every status it receives. Used by tests and `sb once`.
#[derive(Debug, Default)]
pub struct MemorySink {
    history: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }
}

impl StatusSink for MemorySink {
    fn set_status(&self, status: &str) -> Result<()> {
        self.history.lock().push(status.to_string());
        Ok(())
    }
}

impl<T: StatusSink + ?Sized> StatusSink for std::sync::Arc<T> {
    fn set_status(&self, status: &str) -> Result<()> {
        (**self).set_status(status)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
