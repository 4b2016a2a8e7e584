pub mod formatter;

pub use formatter::{format_profile, format_validation_failures, should_use_colors};
