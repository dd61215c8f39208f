// Core daemon logic: blocks, aggregation, scheduling and lifecycle

pub mod aggregator;
pub mod block;
pub mod config;
pub mod lifecycle;
pub mod scheduler;
pub mod trigger;

// Re-export commonly used items
pub use aggregator::{Aggregator, StatusSnapshot, StatusTable, DEFAULT_DELIMITER, OUTPUT_MAX};
pub use block::{Block, BlockRegistry};
pub use config::{Config, ConfigSource};
pub use lifecycle::{ControlHandle, ControlRequest, Controller, LifecycleState};
pub use scheduler::{poll_once, Session};
pub use trigger::{TriggerDispatcher, TriggerOutcome};
