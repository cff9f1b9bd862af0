use crate::constants::{HEARTBEAT_INTERVAL_SECS, IDLE_DETECTION_SECS};
use crate::error::AppError;
use crate::validation::{parse_secs, validate_heartbeat_secs, validate_idle_threshold_secs};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_HEARTBEAT_SECS: &str = "SITETIME_HEARTBEAT_SECS";
pub const ENV_IDLE_THRESHOLD_SECS: &str = "SITETIME_IDLE_THRESHOLD_SECS";
pub const ENV_DB_PATH: &str = "SITETIME_DB_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    pub heartbeat_interval_secs: u64,
    pub idle_threshold_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: HEARTBEAT_INTERVAL_SECS,
            idle_threshold_secs: IDLE_DETECTION_SECS,
        }
    }
}

impl TrackerConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

/// Runtime settings shared by both binaries
#[derive(Debug, Clone)]
pub struct Settings {
    pub tracker: TrackerConfig,
    pub db_path: PathBuf,
}

impl Settings {
    /// Load settings from the process environment, falling back to defaults.
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut tracker = TrackerConfig::default();

        if let Some(raw) = lookup(ENV_HEARTBEAT_SECS) {
            tracker.heartbeat_interval_secs =
                validate_heartbeat_secs(parse_secs("heartbeat_interval_secs", &raw)?)?;
        }
        if let Some(raw) = lookup(ENV_IDLE_THRESHOLD_SECS) {
            tracker.idle_threshold_secs =
                validate_idle_threshold_secs(parse_secs("idle_threshold_secs", &raw)?)?;
        }

        let db_path = match lookup(ENV_DB_PATH) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
            _ => default_db_path()?,
        };

        Ok(Self { tracker, db_path })
    }
}

/// Get the default database path, creating the data directory if needed.
pub fn default_db_path() -> Result<PathBuf, AppError> {
    let proj_dirs =
        ProjectDirs::from("com", "sitetime", "Sitetime").ok_or(AppError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("sitetime.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.heartbeat_interval_secs, 5);
        assert_eq!(config.idle_threshold_secs, 120);
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_HEARTBEAT_SECS, "10"),
            (ENV_IDLE_THRESHOLD_SECS, "60"),
            (ENV_DB_PATH, "/tmp/sitetime-test.db"),
        ]))
        .unwrap();

        assert_eq!(settings.tracker.heartbeat_interval_secs, 10);
        assert_eq!(settings.tracker.idle_threshold_secs, 60);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/sitetime-test.db"));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let result = Settings::from_lookup(lookup_from(&[
            (ENV_HEARTBEAT_SECS, "0"),
            (ENV_DB_PATH, "/tmp/x.db"),
        ]));
        assert!(matches!(result, Err(AppError::InvalidInput { .. })));

        let result = Settings::from_lookup(lookup_from(&[
            (ENV_IDLE_THRESHOLD_SECS, "5"),
            (ENV_DB_PATH, "/tmp/x.db"),
        ]));
        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }
}
