use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the sb daemon
#[derive(Error, Debug)]
pub enum SbError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Display unavailable: {0}")]
    DisplayUnavailable(String),

    #[error("Unknown block: {0}")]
    UnknownBlock(String),

    #[error("Signal error: {0}")]
    Signal(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sb
pub type Result<T> = std::result::Result<T, SbError>;

impl SbError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SbError::Config(msg.into())
    }

    /// Create a display unavailable error
    pub fn display_unavailable<S: Into<String>>(msg: S) -> Self {
        SbError::DisplayUnavailable(msg.into())
    }

    pub fn unknown_block<S: Into<String>>(name: S) -> Self {
        SbError::UnknownBlock(name.into())
    }

    pub fn signal<S: Into<String>>(msg: S) -> Self {
        SbError::Signal(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        SbError::Render(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SbError::Other(msg.into())
    }
}
