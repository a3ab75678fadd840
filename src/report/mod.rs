pub mod format;
pub mod log;

pub use format::{format_output_string, OutputLine};
pub use log::{slugify, write_log, LogOptions, DEFAULT_LOG_DIR};
