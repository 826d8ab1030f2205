// src/config.rs
//
// Session configuration.
//
// Defaults reproduce the current tool. A JSON file may override any subset
// of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::mapper::FrequencyBand;
use crate::state::ChartKind;
use crate::tempo::{BASE_BPM, Tempo};

// Default configuration
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "rgba(0, 0, 255, 1)";
pub const DEFAULT_BAR_COLOR: &str = "rgba(75, 192, 192, 0.2)";
pub const DEFAULT_CHART_COLOR: &str = "rgba(255, 99, 132, 0.2)";
pub const DEFAULT_MIN_SPEED: f64 = 0.25;
pub const DEFAULT_MAX_SPEED: f64 = 4.0;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Configuration for a playback session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SonifyConfig {
    /// Band every value is mapped into.
    pub frequency_band: FrequencyBand,

    /// Tempo at speed 1.0.
    pub base_bpm: f64,

    /// Speed used before the slider is touched.
    pub default_speed: f64,

    pub min_speed: f64,

    pub max_speed: f64,

    /// Color of the element currently sounding.
    pub highlight_color: String,

    /// Base color of bar charts.
    pub bar_color: String,

    /// Base color of every other chart.
    pub chart_color: String,

    /// Largest accepted CSV upload.
    pub max_upload_bytes: u64,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self {
            frequency_band: FrequencyBand::STANDARD,
            base_bpm: BASE_BPM,
            default_speed: 1.0,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            bar_color: DEFAULT_BAR_COLOR.to_string(),
            chart_color: DEFAULT_CHART_COLOR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl SonifyConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SonifyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let band = self.frequency_band;
        if !(band.min.is_finite() && band.max.is_finite() && band.min > 0.0 && band.min < band.max)
        {
            return Err(ConfigError::Invalid(format!(
                "frequency band must satisfy 0 < min < max, got [{}, {}]",
                band.min, band.max
            )));
        }
        if !(self.base_bpm.is_finite() && self.base_bpm > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "base tempo must be positive, got {}",
                self.base_bpm
            )));
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed && self.max_speed.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "speed limits must satisfy 0 < min <= max, got [{}, {}]",
                self.min_speed, self.max_speed
            )));
        }
        self.check_speed(self.default_speed)
            .map_err(|e| ConfigError::Invalid(format!("default speed: {e}")))?;
        Ok(())
    }

    /// Accept a slider value.
    pub fn check_speed(&self, speed: f64) -> Result<f64, ValidationError> {
        if speed.is_finite() && speed >= self.min_speed && speed <= self.max_speed {
            Ok(speed)
        } else {
            Err(ValidationError::InvalidSpeed(speed))
        }
    }

    pub fn initial_tempo(&self) -> Tempo {
        Tempo::new(self.base_bpm, self.default_speed)
    }

    /// Base element color for a chart kind.
    pub fn base_color(&self, kind: ChartKind) -> &str {
        match kind {
            ChartKind::Bar => &self.bar_color,
            _ => &self.chart_color,
        }
    }
}
