// src/config.rs
// Caller configuration, read from a simple `key = value` file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::defs::{
    DEFAULT_TITLE, HIGHLIGHT_DURATION, HISTORY_LEN, ROLL_DURATION, ROLL_INTERVAL, Timing,
};
use crate::error::{CallerError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "conf/caller.conf";
pub const DEFAULT_LOG_FILE: &str = "logs/caller.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerConfig {
    pub title: String,
    pub share_url: Option<String>,
    pub timing: Timing,
    pub history_len: usize,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            share_url: None,
            timing: Timing::default(),
            history_len: HISTORY_LEN,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// What happened while loading the configuration. Logging starts only after the
/// config is known, so this is kept and logged once the subscriber is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub source: String,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn log(&self) {
        info!("{}", self.source);
        for warning in &self.warnings {
            warn!("{warning}");
        }
    }
}

impl CallerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<String>)> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(Self::from_map(&parse_config(&content)))
    }

    /// Builds a config from parsed pairs. Values that cannot be used fall back to
    /// the default and are reported in the returned list.
    fn from_map(config_map: &HashMap<String, String>) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let title = match config_map.get("title") {
            Some(t) if t.is_empty() => {
                warnings.push("Ignoring empty title, using the default".to_string());
                defaults.title
            }
            Some(t) => t.clone(),
            None => defaults.title,
        };

        let share_url = config_map.get("share_url").filter(|u| !u.is_empty()).cloned();

        let roll_interval = match millis(config_map, "roll_interval_ms", &mut warnings) {
            Some(d) if d.is_zero() => {
                warnings.push("Ignoring roll_interval_ms = 0, using the default".to_string());
                ROLL_INTERVAL
            }
            Some(d) => d,
            None => ROLL_INTERVAL,
        };
        let timing = Timing {
            roll_duration: millis(config_map, "roll_duration_ms", &mut warnings)
                .unwrap_or(ROLL_DURATION),
            roll_interval,
            highlight: millis(config_map, "highlight_ms", &mut warnings)
                .unwrap_or(HIGHLIGHT_DURATION),
        };

        let history_len = match config_map.get("history_len") {
            Some(h) => h.parse::<usize>().unwrap_or_else(|_| {
                warnings.push(format!("Ignoring invalid history_len = {h}, using the default"));
                defaults.history_len
            }),
            None => defaults.history_len,
        };

        let log_file = config_map
            .get("log_file")
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let log_level = config_map
            .get("log_level")
            .filter(|l| !l.is_empty())
            .cloned()
            .unwrap_or(defaults.log_level);

        let config = CallerConfig { title, share_url, timing, history_len, log_file, log_level };
        (config, warnings)
    }

    /// Reads the file at `path`, falling back to defaults when it is missing or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, LoadReport) {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok((config, warnings)) => {
                let source = format!("Loaded configuration from {}", path.display());
                (config, LoadReport { source, warnings })
            }
            Err(e) => {
                let report = LoadReport {
                    source: "Using default configuration".to_string(),
                    warnings: vec![format!("Could not load config from {}: {e}", path.display())],
                };
                (Self::default(), report)
            }
        }
    }

    /// Like `load_or_default`, but a config path given explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<(Self, LoadReport)> {
        match path {
            Some(path) => {
                let (config, warnings) = Self::from_file(path).map_err(|e| CallerError::Config {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                let source = format!("Loaded configuration from {}", path.display());
                Ok((config, LoadReport { source, warnings }))
            }
            None => Ok(Self::load_or_default(DEFAULT_CONFIG_PATH)),
        }
    }

    pub fn log_summary(&self) {
        info!(
            title = %self.title,
            share_url = self.share_url.as_deref().unwrap_or("-"),
            roll_ms = self.timing.roll_duration.as_millis() as u64,
            tick_ms = self.timing.roll_interval.as_millis() as u64,
            highlight_ms = self.timing.highlight.as_millis() as u64,
            history_len = self.history_len,
            "Caller configuration"
        );
    }
}

fn millis(
    config_map: &HashMap<String, String>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<Duration> {
    let value = config_map.get(key)?;
    match value.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            warnings.push(format!("Ignoring invalid duration {key} = {value}, using the default"));
            None
        }
    }
}

fn parse_config(content: &str) -> HashMap<String, String> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse key = value pairs
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            config.insert(key, value);
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let content = r#"
            # This is a comment
            title = Friday Night Bingo
            roll_duration_ms = 500
            # Another comment
            share_url = https://example.org/bingo?night=friday
        "#;

        let config = parse_config(content);
        assert_eq!(config.get("title"), Some(&"Friday Night Bingo".to_string()));
        assert_eq!(config.get("roll_duration_ms"), Some(&"500".to_string()));
        // Only the first '=' splits, so query strings survive
        assert_eq!(
            config.get("share_url"),
            Some(&"https://example.org/bingo?night=friday".to_string())
        );
    }

    #[test]
    fn test_caller_config_default() {
        let config = CallerConfig::default();
        assert_eq!(config.title, "Pallion Action Group BINGO!");
        assert_eq!(config.share_url, None);
        assert_eq!(config.timing.roll_duration, Duration::from_millis(300));
        assert_eq!(config.timing.roll_interval, Duration::from_millis(40));
        assert_eq!(config.timing.highlight, Duration::from_millis(400));
        assert_eq!(config.history_len, 11);
        assert_eq!(config.log_file, PathBuf::from("logs/caller.log"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_from_map() {
        let content = "
            title = Community Bingo
            roll_duration_ms = 600
            roll_interval_ms = 50
            highlight_ms = 1000
            history_len = 5
            log_level = debug
        ";
        let (config, warnings) = CallerConfig::from_map(&parse_config(content));
        assert!(warnings.is_empty());
        assert_eq!(config.title, "Community Bingo");
        assert_eq!(config.timing.roll_steps(), 12);
        assert_eq!(config.timing.highlight, Duration::from_secs(1));
        assert_eq!(config.history_len, 5);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.share_url, None);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let content = "
            title =
            roll_interval_ms = 0
            highlight_ms = soon
            history_len = -3
        ";
        let (config, warnings) = CallerConfig::from_map(&parse_config(content));
        assert_eq!(config, CallerConfig::default());
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn test_ignored_values_are_reported() {
        let content = "
            highlight_ms = soon
            history_len = many
        ";
        let (config, warnings) = CallerConfig::from_map(&parse_config(content));
        assert_eq!(config.timing.highlight, HIGHLIGHT_DURATION);
        assert_eq!(config.history_len, HISTORY_LEN);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("highlight_ms = soon")));
        assert!(warnings.iter().any(|w| w.contains("history_len = many")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (config, report) = CallerConfig::load_or_default("does/not/exist.conf");
        assert_eq!(config, CallerConfig::default());
        assert_eq!(report.source, "Using default configuration");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("does/not/exist.conf"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = CallerConfig::load(Some(Path::new("does/not/exist.conf")));
        assert!(matches!(result, Err(CallerError::Config { .. })));
    }
}
