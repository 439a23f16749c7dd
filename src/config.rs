//! Analysis configuration

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::metrics::Formula;
use crate::analytics::plateau::PlateauCriteria;

/// Tunable analytics parameters; every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub plateau_threshold_weeks: i64,
    pub plateau_tolerance_percent: f64,
    /// Average RPE at or above which fatigue is flagged
    pub rpe_threshold: f64,
    /// Prefer the smaller increment when reps are high
    pub conservative: bool,
    pub weeks_forward: u32,
    /// History window loaded from the database
    pub lookback_weeks: i64,
    /// Formula for the standalone 1RM estimate in reports
    pub formula: Formula,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let plateau = PlateauCriteria::default();
        Self {
            plateau_threshold_weeks: plateau.threshold_weeks,
            plateau_tolerance_percent: plateau.tolerance_percent,
            rpe_threshold: 8.5,
            conservative: true,
            weeks_forward: 4,
            lookback_weeks: 12,
            formula: Formula::Epley,
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Start of the lookback window ending at `now`
    pub fn history_since(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let Some(since) = Duration::try_weeks(self.lookback_weeks).and_then(|w| now.checked_sub_signed(w))
        else {
            bail!("lookback of {} weeks is out of range", self.lookback_weeks);
        };
        Ok(since)
    }

    pub fn plateau_criteria(&self) -> PlateauCriteria {
        PlateauCriteria {
            threshold_weeks: self.plateau_threshold_weeks,
            tolerance_percent: self.plateau_tolerance_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.plateau_criteria(), PlateauCriteria::default());
        assert_eq!(config.rpe_threshold, 8.5);
        assert!(config.conservative);
        assert_eq!(config.weeks_forward, 4);
        assert_eq!(config.lookback_weeks, 12);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"conservative": false, "formula": "brzycki", "weeks_forward": 8}}"#).unwrap();

        let config = AnalysisConfig::load(file.path()).unwrap();
        assert!(!config.conservative);
        assert_eq!(config.formula, Formula::Brzycki);
        assert_eq!(config.weeks_forward, 8);
        assert_eq!(config.rpe_threshold, 8.5);
    }

    #[test]
    fn test_unknown_formula_falls_back_to_epley() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"formula": "mayhew"}}"#).unwrap();

        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.formula, Formula::Epley);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AnalysisConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("parsing config"), "Error: {}", err);
    }

    #[test]
    fn test_history_since() {
        let now = Utc.with_ymd_and_hms(2024, 3, 25, 12, 0, 0).unwrap();
        let config = AnalysisConfig::default();
        assert_eq!(
            config.history_since(now).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_history_since_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 25, 12, 0, 0).unwrap();
        let config = AnalysisConfig {
            lookback_weeks: i64::MAX,
            ..AnalysisConfig::default()
        };
        let err = config.history_since(now).unwrap_err();
        assert!(err.to_string().contains("out of range"), "Error: {}", err);
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = AnalysisConfig::load_or_default(None).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }
}
