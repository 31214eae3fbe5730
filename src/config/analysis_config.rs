use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Relative change in gradient magnitude that opens a new segment (0.5 = 50%)
const DEFAULT_GRADIENT_TOLERANCE: f64 = 0.5;

/// Minimum duration a segment must span before a magnitude change can split it (hours)
const DEFAULT_MIN_SEGMENT_HOURS: f64 = 0.25;

/// Length of the recent-usage averaging window (hours)
const DEFAULT_USAGE_WINDOW_HOURS: f64 = 48.0;

/// Interval between projected points on a prediction step curve (hours)
const DEFAULT_STEP_HOURS: f64 = 1.0;

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Relative gradient change treated as a new rate regime within one trend
    pub gradient_tolerance: f64,

    /// Segments younger than this cannot be split on magnitude alone,
    /// which keeps single noisy readings from over-segmenting the series
    pub min_segment_hours: f64,

    /// Width of the recent-usage window used by the second prediction
    pub usage_window_hours: f64,

    /// Step interval of the discretized depletion curve
    pub step_hours: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gradient_tolerance: DEFAULT_GRADIENT_TOLERANCE,
            min_segment_hours: DEFAULT_MIN_SEGMENT_HOURS,
            usage_window_hours: DEFAULT_USAGE_WINDOW_HOURS,
            step_hours: DEFAULT_STEP_HOURS,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when no file exists
    pub fn load_or_default() -> Self {
        let path = default_config_path();
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => return config,
                Err(e) => log::warn!("Failed to load {}: {}, using defaults", path.display(), e),
            }
        }
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check that all thresholds are usable
    pub fn validate(&self) -> Result<()> {
        if self.gradient_tolerance <= 0.0 || !self.gradient_tolerance.is_finite() {
            return Err(AppError::Config(format!(
                "gradient_tolerance must be positive, got {}",
                self.gradient_tolerance
            )));
        }
        if self.min_segment_hours < 0.0 || !self.min_segment_hours.is_finite() {
            return Err(AppError::Config(format!(
                "min_segment_hours must not be negative, got {}",
                self.min_segment_hours
            )));
        }
        if self.usage_window_hours <= 0.0 || !self.usage_window_hours.is_finite() {
            return Err(AppError::Config(format!(
                "usage_window_hours must be positive, got {}",
                self.usage_window_hours
            )));
        }
        if self.step_hours <= 0.0 || !self.step_hours.is_finite() {
            return Err(AppError::Config(format!(
                "step_hours must be positive, got {}",
                self.step_hours
            )));
        }
        Ok(())
    }
}

/// Get the default configuration path
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|config_dir| config_dir.join("drainwatch").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json")) // Fallback to current directory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();

        assert_eq!(config.gradient_tolerance, 0.5);
        assert_eq!(config.min_segment_hours, 0.25);
        assert_eq!(config.usage_window_hours, 48.0);
        assert_eq!(config.step_hours, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let mut config = AnalysisConfig::default();
        config.gradient_tolerance = 0.0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.step_hours = -1.0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.usage_window_hours = f64::NAN;
        assert!(config.validate().is_err());
    }
}
