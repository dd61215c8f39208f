// Command handlers module
pub mod list;
pub mod once;
pub mod run;
pub mod signal;
pub mod version;

// Re-exports for cleaner imports
pub use list::execute as list;
pub use once::execute as once;
pub use run::execute as run;
pub use signal::{reload, trigger};
pub use version::execute as version;
