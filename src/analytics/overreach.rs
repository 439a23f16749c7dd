//! Overreaching detection from RPE drift and performance decline

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::metrics::mean;
use super::Confidence;
use crate::session::{chronological, SessionRecord};

/// Sessions inspected for RPE signals
const RECENT_SESSIONS: usize = 5;

/// Second-half performance below this share of the first half is a decline
const DECLINE_RATIO: f64 = 0.95;

/// A single warning sign
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "factor", rename_all = "snake_case")]
pub enum OverreachFactor {
    HighAverageRpe { average: f64 },
    RpeTrendingUp,
    PerformanceDecline,
}

impl fmt::Display for OverreachFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverreachFactor::HighAverageRpe { average } => write!(f, "High average RPE ({:.1})", average),
            OverreachFactor::RpeTrendingUp => f.write_str("RPE trending upward"),
            OverreachFactor::PerformanceDecline => {
                f.write_str("Performance declining despite consistent training")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverreachAssessment {
    pub is_overreaching: bool,
    pub confidence: Confidence,
    pub factors: Vec<OverreachFactor>,
    pub recommendation: String,
}

/// Flag overreaching when at least two warning signs are present.
///
/// RPE signals come from the last five sessions; the performance signal
/// compares mean session max weight across the two halves of the whole history.
pub fn detect_overreaching(history: &[SessionRecord], rpe_threshold: f64) -> OverreachAssessment {
    if history.len() < 3 {
        return OverreachAssessment {
            is_overreaching: false,
            confidence: Confidence::Low,
            factors: Vec::new(),
            recommendation: "Need more data for overreaching assessment.".to_string(),
        };
    }

    let sessions = chronological(history);
    let recent = &sessions[sessions.len().saturating_sub(RECENT_SESSIONS)..];
    let mut factors = Vec::new();

    let rpe_values: Vec<f64> = recent.iter().filter_map(|s| s.rpe()).collect();
    if let Some(average) = mean(&rpe_values) {
        if average >= rpe_threshold {
            factors.push(OverreachFactor::HighAverageRpe { average });
        }
        if rpe_values.len() >= 3
            && let (Some(first), Some(last)) = (rpe_values.first(), rpe_values.last())
            && *last > *first + 1.0
        {
            factors.push(OverreachFactor::RpeTrendingUp);
        }
    }

    if sessions.len() >= 4 {
        let maxima: Vec<f64> = sessions.iter().map(|s| s.max_weight()).collect();
        let (first_half, second_half) = maxima.split_at(maxima.len() / 2);
        if let (Some(first_avg), Some(second_avg)) = (mean(first_half), mean(second_half))
            && second_avg < first_avg * DECLINE_RATIO
        {
            factors.push(OverreachFactor::PerformanceDecline);
        }
    }

    let is_overreaching = factors.len() >= 2;
    let recommendation = match factors.len() {
        0 => "No signs of overreaching. Continue current program.",
        1 => "Monitor fatigue levels. One warning sign present.",
        _ => "Consider a deload week: reduce volume by 40-50% and intensity by 10%.",
    };
    let confidence = if rpe_values.len() >= 3 {
        Confidence::High
    } else {
        Confidence::Medium
    };

    debug!(factors = factors.len(), rpe_values = rpe_values.len(), is_overreaching, "overreach check");

    OverreachAssessment {
        is_overreaching,
        confidence,
        factors,
        recommendation: recommendation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::{rated_session, session};

    const THRESHOLD: f64 = 8.5;

    #[test]
    fn test_insufficient_data() {
        let history = vec![session(0, 100.0, 5), session(7, 100.0, 5)];
        let result = detect_overreaching(&history, THRESHOLD);
        assert!(!result.is_overreaching);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.factors.is_empty());
        assert!(result.recommendation.contains("Need more data"));
    }

    #[test]
    fn test_no_warning_signs() {
        let history = vec![
            rated_session(0, 100.0, 5, 7.0),
            rated_session(3, 102.5, 5, 7.5),
            rated_session(7, 105.0, 5, 7.0),
            rated_session(10, 105.0, 5, 7.5),
        ];
        let result = detect_overreaching(&history, THRESHOLD);
        assert!(!result.is_overreaching);
        assert!(result.factors.is_empty());
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.recommendation.contains("Continue"));
    }

    #[test]
    fn test_high_rpe_and_decline() {
        let history = vec![
            rated_session(0, 120.0, 5, 9.0),
            rated_session(3, 120.0, 5, 9.0),
            rated_session(7, 100.0, 5, 9.0),
            rated_session(10, 100.0, 5, 9.0),
        ];
        let result = detect_overreaching(&history, THRESHOLD);
        assert!(result.is_overreaching);
        assert_eq!(
            result.factors,
            vec![
                OverreachFactor::HighAverageRpe { average: 9.0 },
                OverreachFactor::PerformanceDecline,
            ]
        );
        assert!(result.recommendation.contains("deload"));
    }

    #[test]
    fn test_rpe_trending_up_alone_is_a_warning() {
        let history = vec![
            rated_session(0, 100.0, 5, 6.0),
            rated_session(3, 100.0, 5, 7.0),
            rated_session(7, 100.0, 5, 7.5),
        ];
        let result = detect_overreaching(&history, THRESHOLD);
        assert!(!result.is_overreaching);
        assert_eq!(result.factors, vec![OverreachFactor::RpeTrendingUp]);
        assert!(result.recommendation.contains("Monitor"));
    }

    #[test]
    fn test_rpe_trend_uses_last_five_only() {
        // The 5.0 session is the sixth from the end and is ignored
        let history = vec![
            rated_session(0, 100.0, 5, 5.0),
            rated_session(2, 100.0, 5, 7.0),
            rated_session(4, 100.0, 5, 7.0),
            rated_session(6, 100.0, 5, 7.5),
            rated_session(8, 100.0, 5, 7.5),
            rated_session(10, 100.0, 5, 7.5),
        ];
        let result = detect_overreaching(&history, THRESHOLD);
        assert!(result.factors.is_empty(), "Factors: {:?}", result.factors);
    }

    #[test]
    fn test_unsorted_input_is_read_oldest_first() {
        let history = vec![
            rated_session(10, 100.0, 5, 7.5),
            rated_session(7, 100.0, 5, 7.5),
            rated_session(3, 120.0, 5, 7.0),
            rated_session(0, 120.0, 5, 6.0),
        ];
        let result = detect_overreaching(&history, THRESHOLD);
        assert!(result.is_overreaching);
        assert_eq!(
            result.factors,
            vec![OverreachFactor::RpeTrendingUp, OverreachFactor::PerformanceDecline]
        );
    }

    #[test]
    fn test_medium_confidence_without_rpe() {
        let history = vec![session(0, 100.0, 5), session(7, 100.0, 5), session(14, 100.0, 5)];
        let result = detect_overreaching(&history, THRESHOLD);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_factor_display() {
        let factor = OverreachFactor::HighAverageRpe { average: 8.96 };
        assert_eq!(factor.to_string(), "High average RPE (9.0)");
        assert_eq!(OverreachFactor::RpeTrendingUp.to_string(), "RPE trending upward");
    }
}
