pub mod models;
pub mod utils;

/// Placeholder text for optional display fields that could not be resolved.
pub const UNKNOWN_TEXT: &str = "Unknown";
