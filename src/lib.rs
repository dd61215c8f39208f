// sb library - public API

// Re-export error types
pub mod error;
pub use error::{Result, SbError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod providers;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use core::config::Config;
pub use providers::builtin_registry;

// Initialize logging
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // RUST_LOG, when set, takes precedence over the default level
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
