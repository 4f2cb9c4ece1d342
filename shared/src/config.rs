//! Viewer configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration and the viewer runs without any. The query limit and the
//! table row cap are fixed at [`DEFAULT_LIMIT`](crate::DEFAULT_LIMIT) and are
//! not settings; unknown keys are ignored.

use serde::{Deserialize, Serialize};

use crate::messages::LOGS_PATH;

/// Errors from [`ViewerConfig::validate`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("`chart_height` must be a positive number, got {0}")]
    ChartHeight(f64),
}

/// Runtime settings for the telemetry viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Origin of the query server; empty means same origin
    pub base_url: String,

    /// Path of the log query endpoint
    pub logs_path: String,

    /// Length of the trailing window used in auto time range mode
    pub auto_range_minutes: u32,

    /// Period of the auto-refresh timer
    pub auto_refresh_interval_ms: u32,

    /// Whether auto-refresh starts enabled
    pub auto_refresh_enabled: bool,

    /// Chart height in CSS pixels
    pub chart_height: f64,

    /// Maximum tracing level ("trace", "debug", "info", "warn", "error")
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            logs_path: LOGS_PATH.to_string(),
            auto_range_minutes: 15,
            auto_refresh_interval_ms: 10_000,
            auto_refresh_enabled: true,
            chart_height: 180.0,
            log_level: "debug".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse from a TOML string; missing keys keep their defaults
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reject settings the viewer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_range_minutes == 0 {
            return Err(ConfigError::Zero("auto_range_minutes"));
        }
        if self.auto_refresh_interval_ms == 0 {
            return Err(ConfigError::Zero("auto_refresh_interval_ms"));
        }
        if !(self.chart_height.is_finite() && self.chart_height > 0.0) {
            return Err(ConfigError::ChartHeight(self.chart_height));
        }
        Ok(())
    }
}
