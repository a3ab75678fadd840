use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::data::DEFAULT_CATALOG_PATH;
use crate::report::DEFAULT_LOG_DIR;

pub const DATA_PATH_ENV: &str = "SHIELDTESTER_DATA";
pub const LOG_DIR_ENV: &str = "SHIELDTESTER_LOG_DIR";
pub const MAX_CORES_ENV: &str = "SHIELDTESTER_MAX_CORES";

/// Process-level settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub log_dir: PathBuf,
    /// Worker ceiling; 0 means every available core.
    pub max_cores: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            max_cores: 0,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or blank values keep the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();
        if let Some(path) = value(DATA_PATH_ENV) {
            settings.data_path = PathBuf::from(path);
        }
        if let Some(dir) = value(LOG_DIR_ENV) {
            settings.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = value(MAX_CORES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(cores) => settings.max_cores = cores,
                Err(_) => warn!(value = %raw, "ignoring invalid {MAX_CORES_ENV}"),
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (DATA_PATH_ENV, "/tmp/catalog.json"),
            (LOG_DIR_ENV, "/tmp/logs"),
            (MAX_CORES_ENV, " 3 "),
        ]));
        assert_eq!(settings.data_path, PathBuf::from("/tmp/catalog.json"));
        assert_eq!(settings.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(settings.max_cores, 3);
    }

    #[test]
    fn invalid_core_count_is_ignored() {
        let settings = Settings::from_lookup(lookup(&[(MAX_CORES_ENV, "many")]));
        assert_eq!(settings.max_cores, 0);
    }
}
