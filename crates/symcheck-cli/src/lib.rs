//! Shared utilities for symcheck-cli
//!
//! Argument parsing helpers and input handling, separated from the
//! binary so they stay testable.

pub mod parsers;
pub mod processing;

// Re-export commonly used items at the crate root for convenience
pub use parsers::{
    parse_backgrounds, parse_report_format, parse_sample_mode, resolve_flag_override,
};
pub use processing::{expand_inputs, process_single_image, SUPPORTED_EXTENSIONS};
