//! Calculation settings
//!
//! Settings are plain serde structs stored as JSON. Missing fields take
//! their default values, so a partial file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SkyError};

/// Default row limit for a single ephemeris table
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Default step limit for a single conjunction scan
pub const DEFAULT_SCAN_MAX_SAMPLES: usize = 1_000_000;

/// Knobs that change how the core computes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationSettings {
    /// Use truncated theories where a faster one exists
    pub prefer_fast_calculation: bool,
    /// Add atmospheric refraction to reported altitudes
    pub apply_refraction: bool,
    /// Sampling step of the conjunction scan in days
    pub conjunction_step_days: f64,
    /// Largest table `ephemeris::generate_table` will build
    pub ephemeris_max_rows: usize,
    /// Most sampling steps a conjunction scan may take
    pub scan_max_samples: usize,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            prefer_fast_calculation: false,
            apply_refraction: false,
            conjunction_step_days: 1.0,
            ephemeris_max_rows: DEFAULT_MAX_ROWS,
            scan_max_samples: DEFAULT_SCAN_MAX_SAMPLES,
        }
    }
}

impl CalculationSettings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: CalculationSettings = serde_json::from_str(json)
            .map_err(|e| SkyError::Config(format!("invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| SkyError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SkyError::Config(format!("cannot serialize settings: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.conjunction_step_days.is_finite() && self.conjunction_step_days > 0.0) {
            return Err(SkyError::Config(format!(
                "conjunction_step_days must be positive, got {}",
                self.conjunction_step_days
            )));
        }
        if self.conjunction_step_days > 5.0 {
            return Err(SkyError::Config(format!(
                "conjunction_step_days {} is too coarse to bracket events",
                self.conjunction_step_days
            )));
        }
        if self.ephemeris_max_rows == 0 {
            return Err(SkyError::Config(
                "ephemeris_max_rows must be at least 1".to_string(),
            ));
        }
        if self.scan_max_samples == 0 {
            return Err(SkyError::Config(
                "scan_max_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = CalculationSettings::default();
        assert!(settings.validate().is_ok());
        assert!(!settings.prefer_fast_calculation);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            CalculationSettings::from_json_str(r#"{ "prefer_fast_calculation": true }"#).unwrap();
        assert!(settings.prefer_fast_calculation);
        assert_eq!(settings.ephemeris_max_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = CalculationSettings {
            apply_refraction: true,
            ephemeris_max_rows: 42,
            ..Default::default()
        };
        let json = settings.to_json_string().unwrap();
        assert_eq!(CalculationSettings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = CalculationSettings::from_json_str(r#"{ "conjunction_step_days": 0 }"#);
        assert!(matches!(err, Err(SkyError::Config(_))));
        let err = CalculationSettings::from_json_str(r#"{ "ephemeris_max_rows": 0 }"#);
        assert!(matches!(err, Err(SkyError::Config(_))));
        let err = CalculationSettings::from_json_str(r#"{ "scan_max_samples": 0 }"#);
        assert!(matches!(err, Err(SkyError::Config(_))));
        let err = CalculationSettings::from_json_str("not json");
        assert!(matches!(err, Err(SkyError::Config(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "apply_refraction": true }}"#).unwrap();
        let settings = CalculationSettings::from_path(file.path()).unwrap();
        assert!(settings.apply_refraction);

        let missing = CalculationSettings::from_path("/nonexistent/settings.json");
        assert!(matches!(missing, Err(SkyError::Config(_))));
    }
}
