//! Append-only text log of test runs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::export::ExportRegistry;
use crate::optimizer::{TestCase, TestResult};

pub const DEFAULT_LOG_DIR: &str = "Logs";

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H.%M.%S";
const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// File name without extension; the run timestamp when unset.
    pub filename: Option<String>,
    /// Name the file `<filename> <timestamp>`.
    pub time_and_name: bool,
    /// Append a link for this export service.
    pub export_service: Option<String>,
}

/// Keep word characters, whitespace, `.()[]-`; collapse whitespace runs to `_`.
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || "_.()[]-".contains(*c))
        .collect();
    kept.split_ascii_whitespace().collect::<Vec<_>>().join("_")
}

/// Names that slugify to nothing fall back to the timestamp.
pub fn log_file_name(options: &LogOptions, now: DateTime<Utc>) -> String {
    let timestamp = now.format(FILE_TIMESTAMP_FORMAT).to_string();
    let name = match &options.filename {
        None => timestamp.clone(),
        Some(name) if options.time_and_name => format!("{name} {timestamp}"),
        Some(name) => name.clone(),
    };
    let slug = slugify(&name);
    if slug.is_empty() {
        return format!("{}.txt", slugify(&timestamp));
    }
    format!("{slug}.txt")
}

/// Append the test setup, the result, and optionally an export link to a log file in `dir`.
/// Returns the file written.
pub fn write_log(
    dir: impl AsRef<Path>,
    test_case: &TestCase<'_>,
    result: &TestResult,
    options: &LogOptions,
    registry: &ExportRegistry,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let now = Utc::now();

    let mut entry = format!("Test run at: {}\n", now.format(LINE_TIMESTAMP_FORMAT));
    entry.push_str(&test_case.summary());
    entry.push('\n');
    entry.push_str(&result.summary());
    if let Some(service) = &options.export_service {
        entry.push_str("\n\n");
        entry.push_str(&registry.produce_link(&result.loadout, service)?);
    }
    entry.push_str("\n\n\n");

    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(options, now));
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(entry.as_bytes())?;
    file.flush()?;
    info!(path = %path.display(), "wrote test log");
    Ok(path)
}
