use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fleet::{AlertThresholds, ReadingRanges, ValueRange};
use crate::telemetry::recorder::DEFAULT_CAPACITY;

pub const DEFAULT_PACING_MS: u64 = 10;
pub const DEFAULT_MEASURE_ITERATIONS: u64 = 1000;
pub const DEFAULT_WINDOW_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one monitoring session. Every field has a default, so a
/// partial JSON file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Writer suspension between updates.
    pub pacing_ms: u64,
    /// Aggregation passes per measurement window.
    pub measure_iterations: u64,
    /// Minimum time writers run before the run flag is cleared.
    pub window_ms: u64,
    pub ranges: ReadingRanges,
    pub thresholds: AlertThresholds,
    /// Telemetry events kept before the oldest is dropped.
    pub event_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pacing_ms: DEFAULT_PACING_MS,
            measure_iterations: DEFAULT_MEASURE_ITERATIONS,
            window_ms: DEFAULT_WINDOW_MS,
            ranges: ReadingRanges::default(),
            thresholds: AlertThresholds::default(),
            event_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl MonitorConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pacing_ms == 0 {
            return Err(ConfigError::Invalid("pacing_ms must be greater than 0".into()));
        }
        if self.measure_iterations == 0 {
            return Err(ConfigError::Invalid(
                "measure_iterations must be greater than 0".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be greater than 0".into()));
        }
        check_range("speed", &self.ranges.speed)?;
        check_range("temperature", &self.ranges.temperature)?;
        check_range("fuel", &self.ranges.fuel)?;
        if !self.thresholds.overheat.is_finite() || !self.thresholds.low_fuel.is_finite() {
            return Err(ConfigError::Invalid("alert thresholds must be finite".into()));
        }
        Ok(())
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

fn check_range(name: &str, range: &ValueRange) -> Result<(), ConfigError> {
    if range.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} range [{}, {}) is empty or not finite",
            name, range.low, range.high
        )))
    }
}
