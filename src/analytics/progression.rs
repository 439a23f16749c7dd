//! Progression analysis - trend classification and PR counting

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::metrics::{best_1rm_in_history, round_to};
use super::plateau::{detect_plateau, PlateauCriteria};
use super::trend::linear_trend;
use super::Trend;
use crate::session::{dated_maxima, SessionRecord};

/// Weekly slope (weight units) separating improving/declining from stable
const SLOPE_THRESHOLD: f64 = 0.5;

/// Result of analysing one exercise's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionResult {
    pub trend: Trend,
    /// Weight change per week
    pub slope: f64,
    pub r_squared: f64,
    pub weeks_analyzed: i64,
    pub start_weight: f64,
    pub current_weight: f64,
    pub weight_change: f64,
    pub weight_change_percent: f64,
    pub plateau_weeks: i64,
    pub pr_count: u32,
    pub estimated_1rm: f64,
    pub recommendation: String,
}

impl ProgressionResult {
    fn insufficient(pr_count: u32, estimated_1rm: f64) -> Self {
        Self {
            trend: Trend::InsufficientData,
            slope: 0.0,
            r_squared: 0.0,
            weeks_analyzed: 0,
            start_weight: 0.0,
            current_weight: 0.0,
            weight_change: 0.0,
            weight_change_percent: 0.0,
            plateau_weeks: 0,
            pr_count,
            estimated_1rm: round_to(estimated_1rm, 1),
            recommendation: "Need more workouts for trend analysis.".to_string(),
        }
    }
}

/// Analyse progression with the default plateau criteria
pub fn analyze_progression(history: &[SessionRecord]) -> ProgressionResult {
    analyze_progression_with(history, &PlateauCriteria::default())
}

/// Analyse progression of session max weight over time
pub fn analyze_progression_with(history: &[SessionRecord], criteria: &PlateauCriteria) -> ProgressionResult {
    let series = dated_maxima(history);
    let pr_count = count_weight_prs(&series);
    let estimated_1rm = best_1rm_in_history(history);

    let (Some((first_date, start_weight)), Some((last_date, current_weight))) =
        (series.first().copied(), series.last().copied())
    else {
        debug!("no dated sessions with weight");
        return ProgressionResult::insufficient(pr_count, estimated_1rm);
    };
    if series.len() < 2 {
        debug!(sessions = series.len(), "not enough sessions for a trend");
        return ProgressionResult::insufficient(pr_count, estimated_1rm);
    }

    let (dates, weights): (Vec<DateTime<Utc>>, Vec<f64>) = series.iter().copied().unzip();
    let fit = linear_trend(&dates, &weights);

    let weight_change = current_weight - start_weight;
    let weight_change_percent = if start_weight == 0.0 {
        0.0
    } else {
        weight_change / start_weight * 100.0
    };
    let weeks_analyzed = ((last_date - first_date).num_days() / 7).max(1);

    let plateau = detect_plateau(history, criteria);
    let trend = classify(plateau.is_plateau, fit.slope);

    debug!(?trend, slope = fit.slope, r_squared = fit.r_squared, pr_count, "progression classified");

    ProgressionResult {
        trend,
        slope: round_to(fit.slope, 2),
        r_squared: round_to(fit.r_squared, 3),
        weeks_analyzed,
        start_weight,
        current_weight,
        weight_change: round_to(weight_change, 1),
        weight_change_percent: round_to(weight_change_percent, 1),
        plateau_weeks: plateau.weeks,
        pr_count,
        estimated_1rm: round_to(estimated_1rm, 1),
        recommendation: recommendation(trend, plateau.weeks),
    }
}

/// Sessions whose max weight beat every earlier session; the first always counts
fn count_weight_prs(series: &[(DateTime<Utc>, f64)]) -> u32 {
    let mut all_time_max = 0.0;
    let mut pr_count = 0;
    for (_, weight) in series {
        if *weight > all_time_max {
            all_time_max = *weight;
            pr_count += 1;
        }
    }
    pr_count
}

fn classify(is_plateau: bool, slope: f64) -> Trend {
    if is_plateau {
        Trend::Plateau
    } else if slope > SLOPE_THRESHOLD {
        Trend::Improving
    } else if slope < -SLOPE_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn recommendation(trend: Trend, plateau_weeks: i64) -> String {
    match trend {
        Trend::Improving => {
            "Strong progress! Continue current approach. Consider a small weight increase.".to_string()
        }
        Trend::Plateau => format!(
            "Plateau detected ({} weeks). Consider: varying rep ranges, increasing volume, or taking a deload week.",
            plateau_weeks
        ),
        Trend::Declining => {
            "Performance declining. Check recovery, sleep, and nutrition. Consider a deload.".to_string()
        }
        Trend::Stable => {
            "Stable performance. Ready for progressive overload when you feel prepared.".to_string()
        }
        Trend::InsufficientData => "Need more workouts for trend analysis.".to_string(),
    }
}
