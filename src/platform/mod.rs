// Platform-specific code module

pub mod display;
#[cfg(unix)]
pub mod signals;

// Re-exports para imports limpios
pub use display::{open_sink, MemorySink, SinkKind, StatusSink, StdoutSink, XRootSink};
#[cfg(unix)]
pub use signals::{forward_signals, send_to_running, trigger_signal};
