//! Next-session weight suggestion

use serde::Serialize;
use tracing::debug;

use super::metrics::{mean, round_to};
use super::progression::{analyze_progression_with, ProgressionResult};
use super::plateau::PlateauCriteria;
use super::{Confidence, Trend};
use crate::session::SessionRecord;

/// Standard plate jump
const SMALL_INCREMENT: f64 = 2.5;
const LARGE_INCREMENT: f64 = 5.0;

/// Below this weight a low-rep session is not stepped down
const MIN_REDUCIBLE_WEIGHT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub suggested_weight: Option<f64>,
    pub last_weight: Option<f64>,
    pub last_avg_reps: Option<f64>,
    pub confidence: Confidence,
    pub reasoning: String,
    pub estimated_1rm: Option<f64>,
    pub trend: Option<Trend>,
}

impl SuggestionResult {
    fn no_data(reasoning: &str) -> Self {
        Self {
            suggested_weight: None,
            last_weight: None,
            last_avg_reps: None,
            confidence: Confidence::Low,
            reasoning: reasoning.to_string(),
            estimated_1rm: None,
            trend: None,
        }
    }
}

/// Suggest a weight for the next session with the default plateau criteria
pub fn suggest_next_weight(history: &[SessionRecord], conservative: bool) -> SuggestionResult {
    suggest_next_weight_with(history, conservative, &PlateauCriteria::default())
}

/// Suggest a weight for the next session from the latest session and the overall trend.
///
/// The heaviest weight of the latest session is the baseline; the reps done at
/// exactly that weight decide whether to add, hold or drop load. A plateau or a
/// declining trend overrides the rep-based rules.
pub fn suggest_next_weight_with(
    history: &[SessionRecord],
    conservative: bool,
    criteria: &PlateauCriteria,
) -> SuggestionResult {
    // Last of the latest-dated sessions, so already-sorted input resolves to the final entry
    let Some(latest) = history.iter().max_by_key(|s| s.date) else {
        return SuggestionResult::no_data("No workout history available.");
    };
    if latest.sets.is_empty() {
        return SuggestionResult::no_data("No set data in recent workout.");
    }

    let last_weight = latest.max_weight();
    let reps_at_top: Vec<f64> = latest
        .sets
        .iter()
        .filter(|s| s.weight == Some(last_weight))
        .map(|s| s.rep_count() as f64)
        .collect();
    let avg_reps = mean(&reps_at_top).unwrap_or(0.0);

    let analysis = analyze_progression_with(history, criteria);
    let (suggested, confidence, reasoning) = decide(&analysis, last_weight, avg_reps, conservative);

    debug!(last_weight, avg_reps, suggested, trend = ?analysis.trend, "weight suggestion");

    SuggestionResult {
        suggested_weight: Some(round_to(suggested, 1)),
        last_weight: Some(last_weight),
        last_avg_reps: Some(round_to(avg_reps, 1)),
        confidence,
        reasoning,
        estimated_1rm: Some(analysis.estimated_1rm),
        trend: Some(analysis.trend),
    }
}

fn decide(
    analysis: &ProgressionResult,
    last_weight: f64,
    avg_reps: f64,
    conservative: bool,
) -> (f64, Confidence, String) {
    let reps = avg_reps as i64;

    match analysis.trend {
        Trend::Plateau => (
            last_weight + SMALL_INCREMENT,
            Confidence::Medium,
            format!(
                "Plateau detected. Small {}kg increase to test new weight. Target same reps ({}).",
                SMALL_INCREMENT, reps
            ),
        ),
        Trend::Declining => (
            last_weight,
            Confidence::High,
            "Performance declining. Maintain current weight and focus on form and recovery.".to_string(),
        ),
        _ if avg_reps >= 10.0 => {
            let increase = if conservative { SMALL_INCREMENT } else { LARGE_INCREMENT };
            (
                last_weight + increase,
                Confidence::High,
                format!("Excellent rep performance ({} reps). Ready for {}kg increase.", reps, increase),
            )
        }
        _ if avg_reps >= 8.0 => (
            last_weight + SMALL_INCREMENT,
            Confidence::High,
            format!("Solid performance ({} reps). Suggest {}kg increase.", reps, SMALL_INCREMENT),
        ),
        _ if avg_reps >= 6.0 => (
            last_weight,
            Confidence::High,
            format!(
                "Building strength at current weight ({} reps). Maintain and aim for more reps.",
                reps
            ),
        ),
        _ => {
            let suggested = if last_weight > MIN_REDUCIBLE_WEIGHT {
                last_weight - SMALL_INCREMENT
            } else {
                last_weight
            };
            (
                suggested,
                Confidence::Medium,
                format!(
                    "Low rep performance ({} reps). Consider maintaining or small reduction for better form.",
                    reps
                ),
            )
        }
    }
}
