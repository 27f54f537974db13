//! Utility functions for string formatting.

pub mod format;

pub use format::{age_display, capitalize, clean_flavor_text, normalize_identifier, stat_bar};
