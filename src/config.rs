use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// File looked up in the working directory at launch.
pub const CONFIG_FILE_NAME: &str = "signal-reviewer.json";

// ---------------------------------------------------------------------------
// Review configuration
// ---------------------------------------------------------------------------

/// Playback and display constants. Every field falls back to its default
/// when absent from the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Simulated duration every row is stretched over (seconds).
    pub duration_secs: f64,
    /// Width of the trailing visible window (seconds).
    pub window_secs: f64,
    /// Playback tick interval (milliseconds).
    pub tick_interval_ms: u64,
    /// Low-pass filter used when preprocessing is enabled.
    pub filter: FilterConfig,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            duration_secs: 20.0,
            window_secs: 3.0,
            tick_interval_ms: 100,
            filter: FilterConfig::default(),
        }
    }
}

/// Butterworth low-pass parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub order: usize,
    pub cutoff_hz: f64,
    pub sample_rate_hz: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            order: 4,
            cutoff_hz: 30.0,
            sample_rate_hz: 1000.0,
        }
    }
}

impl ReviewConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Read a config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load `path` if it exists, otherwise use defaults. A broken file is
    /// logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration file: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "window_secs": 5.0, "filter": { "cutoff_hz": 40.0 } }"#)
            .unwrap();

        let config = ReviewConfig::from_file(&path).unwrap();
        assert_eq!(config.window_secs, 5.0);
        assert_eq!(config.duration_secs, 20.0);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.filter.cutoff_hz, 40.0);
        assert_eq!(config.filter.order, 4);
    }

    #[test]
    fn missing_or_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert_eq!(ReviewConfig::load_or_default(&missing), ReviewConfig::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(ReviewConfig::from_file(&broken).is_err());
        assert_eq!(ReviewConfig::load_or_default(&broken), ReviewConfig::default());
    }
}
