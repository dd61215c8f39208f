// UI and formatting module

pub mod formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_si, paint, strip_markers, truncate_utf8, Color};
