//! Configuration for correlation and report generation
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) behaves exactly like the built-in settings.
//!
//! ```toml
//! [correlation]
//! tight_pad_secs = 30
//! wide_pad_secs = 300
//!
//! [report]
//! metric_set = "sirq"
//! ```

use crate::sample_store::MetricSet;
use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest accepted pad (one day); wider pads make tiers meaningless
pub const MAX_PAD_SECS: u32 = 86_400;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wide_pad_secs ({wide}) must be >= tight_pad_secs ({tight})")]
    PadOrder { tight: u32, wide: u32 },

    #[error("{field} must be <= 86400 seconds, got {value}")]
    PadTooLarge { field: &'static str, value: u32 },
}

/// Tolerances used when matching samples to a run window
///
/// # Example
/// ```
/// use benchmon::config::CorrelationConfig;
///
/// let config = CorrelationConfig::default();
/// assert_eq!(config.tight_pad_secs, 30);
/// assert_eq!(config.wide_pad_secs, 300);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Pad on both ends of the window for the exact-window tier
    ///
    /// Absorbs small skew between the tsar clock and the benchmark timer.
    pub tight_pad_secs: u32,

    /// Pad on both ends of the window for the wide-window (last resort) tier
    pub wide_pad_secs: u32,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            tight_pad_secs: 30,
            wide_pad_secs: 300,
        }
    }
}

impl CorrelationConfig {
    pub fn tight_pad(&self) -> Duration {
        Duration::seconds(i64::from(self.tight_pad_secs))
    }

    pub fn wide_pad(&self) -> Duration {
        Duration::seconds(i64::from(self.wide_pad_secs))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tight_pad_secs", self.tight_pad_secs),
            ("wide_pad_secs", self.wide_pad_secs),
        ] {
            if value > MAX_PAD_SECS {
                return Err(ConfigError::PadTooLarge { field, value });
            }
        }

        if self.wide_pad_secs < self.tight_pad_secs {
            return Err(ConfigError::PadOrder {
                tight: self.tight_pad_secs,
                wide: self.wide_pad_secs,
            });
        }

        Ok(())
    }
}

/// Report generation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Metric set to extract; `None` picks the per-format default
    pub metric_set: Option<MetricSet>,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmonConfig {
    pub correlation: CorrelationConfig,
    pub report: ReportConfig,
}

impl BenchmonConfig {
    /// Load and validate a TOML configuration file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        let config: BenchmonConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;
        config.correlation.validate()?;

        Ok(config)
    }
}
