//! Analytics module - strength training analysis over one exercise's history
//!
//! Features:
//! - 1RM estimation, tonnage and volume metrics
//! - Linear trend classification with plateau detection
//! - Overreaching detection from RPE drift
//! - Next-session weight suggestions
//! - 1RM projection and personal record tracking
//!
//! Everything here is a pure function of the history passed in.

pub mod metrics;
pub mod overreach;
pub mod plateau;
pub mod progression;
pub mod records;
pub mod suggestion;
pub mod trajectory;
pub mod trend;
pub mod volume;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use metrics::{
    average_rpe, best_1rm_in_history, estimate_one_rep_max, intensity_percent, total_tonnage,
    volume_summary, Formula, VolumeSummary,
};
pub use overreach::{detect_overreaching, OverreachAssessment, OverreachFactor};
pub use plateau::{detect_plateau, PlateauCriteria, PlateauStatus};
pub use progression::{analyze_progression, analyze_progression_with, ProgressionResult};
pub use records::{find_personal_records, PrEvent, PrKind};
pub use suggestion::{suggest_next_weight, suggest_next_weight_with, SuggestionResult};
pub use trajectory::{project_1rm, OneRmPoint, TrajectoryResult};
pub use trend::{fit_line, linear_trend, LineFit};
pub use volume::{weekly_volume, WeeklyVolume};

use crate::config::AnalysisConfig;
use crate::session::SessionRecord;
use metrics::round_to;

/// Long-term direction of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Plateau,
    Declining,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Plateau => "plateau",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best 1RM under the configured formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OneRmEstimate {
    pub formula: Formula,
    pub value: f64,
}

/// Latest session at a glance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSession {
    pub volume: VolumeSummary,
    pub average_rpe: Option<f64>,
    /// Top weight as a percentage of the all-time estimated 1RM
    pub intensity_percent: f64,
}

/// Every analysis for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseReport {
    pub progression: ProgressionResult,
    pub plateau: PlateauStatus,
    pub overreach: OverreachAssessment,
    pub suggestion: SuggestionResult,
    pub trajectory: TrajectoryResult,
    pub records: Vec<PrEvent>,
    pub weekly_volume: Vec<WeeklyVolume>,
    pub one_rep_max: OneRmEstimate,
    pub latest: Option<LatestSession>,
}

/// Training analytics over one exercise's history
pub struct Analytics<'a> {
    history: &'a [SessionRecord],
    config: &'a AnalysisConfig,
}

impl<'a> Analytics<'a> {
    pub fn new(history: &'a [SessionRecord], config: &'a AnalysisConfig) -> Self {
        Self { history, config }
    }

    pub fn progression(&self) -> ProgressionResult {
        analyze_progression_with(self.history, &self.config.plateau_criteria())
    }

    pub fn plateau(&self) -> PlateauStatus {
        detect_plateau(self.history, &self.config.plateau_criteria())
    }

    pub fn overreach(&self) -> OverreachAssessment {
        detect_overreaching(self.history, self.config.rpe_threshold)
    }

    pub fn suggestion(&self) -> SuggestionResult {
        suggest_next_weight_with(self.history, self.config.conservative, &self.config.plateau_criteria())
    }

    pub fn trajectory(&self) -> TrajectoryResult {
        project_1rm(self.history, self.config.weeks_forward)
    }

    pub fn records(&self) -> Vec<PrEvent> {
        find_personal_records(self.history)
    }

    pub fn weekly_volume(&self) -> Vec<WeeklyVolume> {
        weekly_volume(self.history)
    }

    /// Best 1RM across all sets using the configured formula
    pub fn one_rep_max(&self) -> OneRmEstimate {
        let formula = self.config.formula;
        let value = self
            .history
            .iter()
            .flat_map(|s| &s.sets)
            .map(|set| estimate_one_rep_max(set.load(), set.rep_count(), formula))
            .fold(0.0, f64::max);
        OneRmEstimate {
            formula,
            value: round_to(value, 1),
        }
    }

    /// Volume, RPE and intensity of the most recent session
    pub fn latest(&self) -> Option<LatestSession> {
        let latest = self.history.iter().max_by_key(|s| s.date)?;
        let one_rm = best_1rm_in_history(self.history);
        Some(LatestSession {
            volume: volume_summary(&latest.sets),
            average_rpe: average_rpe(&latest.sets).map(|rpe| round_to(rpe, 1)),
            intensity_percent: round_to(intensity_percent(latest.max_weight(), one_rm), 1),
        })
    }

    pub fn report(&self) -> ExerciseReport {
        ExerciseReport {
            progression: self.progression(),
            plateau: self.plateau(),
            overreach: self.overreach(),
            suggestion: self.suggestion(),
            trajectory: self.trajectory(),
            records: self.records(),
            weekly_volume: self.weekly_volume(),
            one_rep_max: self.one_rep_max(),
            latest: self.latest(),
        }
    }
}
