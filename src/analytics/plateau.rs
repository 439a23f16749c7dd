//! Plateau detection over the most recent sessions

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::{dated_maxima, SessionRecord};

/// Number of most recent sessions inspected
const RECENT_WINDOW: usize = 8;

/// Minimum sessions in the window before a plateau can be considered
const MIN_WINDOW: usize = 3;

/// Thresholds for calling a stall a plateau
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateauCriteria {
    /// Minimum weeks the stall must span
    pub threshold_weeks: i64,
    /// Allowed spread of session maxima, as a percentage of the highest
    pub tolerance_percent: f64,
}

impl Default for PlateauCriteria {
    fn default() -> Self {
        Self {
            threshold_weeks: 2,
            tolerance_percent: 2.5,
        }
    }
}

/// Plateau verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlateauStatus {
    pub is_plateau: bool,
    /// Span of the flat window in weeks; reported even when it is shorter than
    /// the threshold
    pub weeks: i64,
}

/// Detect a plateau in session max weights.
///
/// Looks at the last eight dated sessions. They are a plateau candidate when
/// their spread stays within the tolerance and there are at least three of
/// them; the candidate becomes a plateau once it spans `threshold_weeks`.
pub fn detect_plateau(history: &[SessionRecord], criteria: &PlateauCriteria) -> PlateauStatus {
    let maxima = dated_maxima(history);
    if maxima.len() < 2 {
        return PlateauStatus::default();
    }

    let window = &maxima[maxima.len().saturating_sub(RECENT_WINDOW)..];
    let highest = window.iter().map(|(_, w)| *w).fold(f64::MIN, f64::max);
    let lowest = window.iter().map(|(_, w)| *w).fold(f64::MAX, f64::min);

    let variance_percent = if highest > 0.0 {
        (highest - lowest) / highest * 100.0
    } else {
        0.0
    };

    let is_candidate = variance_percent <= criteria.tolerance_percent && window.len() >= MIN_WINDOW;
    let weeks = match (window.first(), window.last()) {
        (Some((first, _)), Some((last, _))) if is_candidate => ((*last - *first).num_days() / 7).max(1),
        _ => 0,
    };

    debug!(window = window.len(), variance_percent, is_candidate, weeks, "plateau check");

    PlateauStatus {
        is_plateau: is_candidate && weeks >= criteria.threshold_weeks,
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::session;

    fn check(history: &[SessionRecord]) -> PlateauStatus {
        detect_plateau(history, &PlateauCriteria::default())
    }

    #[test]
    fn test_insufficient_sessions() {
        assert_eq!(check(&[]), PlateauStatus::default());
        assert_eq!(check(&[session(0, 100.0, 5)]), PlateauStatus::default());
    }

    #[test]
    fn test_oscillating_within_tolerance() {
        // 8 sessions over 21 days, all within 2% of 100
        let weights = [100.0, 99.0, 101.0, 100.0, 99.5, 100.5, 100.0, 99.0];
        let history: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| session(i as i64 * 3, *w, 5))
            .collect();

        let status = check(&history);
        assert!(status.is_plateau, "Status: {:?}", status);
        assert!(status.weeks >= 2, "Weeks: {}", status.weeks);
        assert_eq!(status.weeks, 3);
    }

    #[test]
    fn test_two_sessions_never_a_candidate() {
        let history = vec![session(0, 100.0, 5), session(21, 100.0, 5)];
        assert_eq!(check(&history), PlateauStatus { is_plateau: false, weeks: 0 });
    }

    #[test]
    fn test_short_flat_stretch_reports_weeks() {
        // Flat for only 10 days: candidate with 1 week, below the threshold
        let history = vec![session(0, 100.0, 5), session(5, 100.0, 5), session(10, 101.0, 5)];
        let status = check(&history);
        assert!(!status.is_plateau);
        assert_eq!(status.weeks, 1);
    }

    #[test]
    fn test_progressing_is_not_plateau() {
        let history = vec![
            session(0, 100.0, 5),
            session(7, 105.0, 5),
            session(14, 110.0, 5),
            session(21, 115.0, 5),
        ];
        assert_eq!(check(&history), PlateauStatus { is_plateau: false, weeks: 0 });
    }

    #[test]
    fn test_only_last_eight_sessions_count() {
        // Early progress falls outside the window
        let mut history = vec![session(0, 60.0, 5), session(7, 80.0, 5)];
        history.extend((0..8).map(|i| session(14 + i * 4, 100.0, 5)));

        let status = check(&history);
        assert!(status.is_plateau);
        assert_eq!(status.weeks, 4);
    }

    #[test]
    fn test_custom_tolerance() {
        let history = vec![session(0, 100.0, 5), session(10, 104.0, 5), session(21, 102.0, 5)];
        assert!(!check(&history).is_plateau);

        let loose = PlateauCriteria { threshold_weeks: 2, tolerance_percent: 5.0 };
        let status = detect_plateau(&history, &loose);
        assert!(status.is_plateau);
        assert_eq!(status.weeks, 3);
    }
}
