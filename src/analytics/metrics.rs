//! Strength metrics: 1RM estimation, tonnage, volume and intensity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::{SessionRecord, SetRecord};

/// Reps at which Brzycki's denominator stops making sense
const BRZYCKI_REP_LIMIT: u32 = 37;

/// 1RM estimation formula; unknown names deserialize as Epley
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Formula {
    #[default]
    Epley,
    Brzycki,
    Lander,
}

impl Formula {
    /// Parse a formula name; anything unrecognised falls back to Epley
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "brzycki" => Formula::Brzycki,
            "lander" => Formula::Lander,
            _ => Formula::Epley,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Formula::Epley => "epley",
            Formula::Brzycki => "brzycki",
            Formula::Lander => "lander",
        }
    }
}

impl From<String> for Formula {
    fn from(name: String) -> Self {
        Formula::from_name(&name)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Estimate the one-rep max from a submaximal set.
///
/// Extreme rep counts cap Brzycki and Lander at twice the lifted weight.
pub fn estimate_one_rep_max(weight: f64, reps: u32, formula: Formula) -> f64 {
    if reps == 0 || weight <= 0.0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }

    let r = reps as f64;
    match formula {
        Formula::Epley => weight * (1.0 + r / 30.0),
        Formula::Brzycki => {
            if reps >= BRZYCKI_REP_LIMIT {
                return weight * 2.0;
            }
            weight * (36.0 / (37.0 - r))
        }
        Formula::Lander => {
            let denominator = 101.3 - 2.67123 * r;
            if denominator <= 0.0 {
                return weight * 2.0;
            }
            (100.0 * weight) / denominator
        }
    }
}

/// Total tonnage: sum of weight x reps
pub fn total_tonnage(sets: &[SetRecord]) -> f64 {
    sets.iter().map(|s| s.load() * s.rep_count() as f64).sum()
}

/// Aggregate volume for a list of sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub total_sets: usize,
    pub total_reps: u32,
    pub tonnage: f64,
    pub avg_weight: f64,
    pub avg_reps: f64,
}

/// Volume summary; averages only count sets where that field is non-zero
pub fn volume_summary(sets: &[SetRecord]) -> VolumeSummary {
    if sets.is_empty() {
        return VolumeSummary::default();
    }

    let weights: Vec<f64> = sets.iter().map(SetRecord::load).filter(|w| *w > 0.0).collect();
    let reps: Vec<u32> = sets.iter().map(SetRecord::rep_count).filter(|r| *r > 0).collect();

    VolumeSummary {
        total_sets: sets.len(),
        total_reps: reps.iter().sum(),
        tonnage: total_tonnage(sets),
        avg_weight: mean(&weights).unwrap_or(0.0),
        avg_reps: mean(&reps.iter().map(|r| *r as f64).collect::<Vec<_>>()).unwrap_or(0.0),
    }
}

/// Weight as a percentage of 1RM, capped at 100
pub fn intensity_percent(weight: f64, one_rm: f64) -> f64 {
    if one_rm <= 0.0 {
        return 0.0;
    }
    (weight / one_rm * 100.0).min(100.0)
}

/// Best Epley 1RM across every set of every session
pub fn best_1rm_in_history(history: &[SessionRecord]) -> f64 {
    history
        .iter()
        .map(SessionRecord::best_one_rep_max)
        .fold(0.0, f64::max)
}

/// Mean RPE over sets that recorded one
pub fn average_rpe(sets: &[SetRecord]) -> Option<f64> {
    let values: Vec<f64> = sets.iter().filter_map(|s| s.rpe).collect();
    mean(&values)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Round to a fixed number of decimal places, ties to even
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::session;

    const FORMULAS: [Formula; 3] = [Formula::Epley, Formula::Brzycki, Formula::Lander];

    #[test]
    fn test_single_rep_is_the_weight() {
        for formula in FORMULAS {
            assert_eq!(estimate_one_rep_max(142.5, 1, formula), 142.5, "{}", formula);
        }
    }

    #[test]
    fn test_zero_inputs() {
        for formula in FORMULAS {
            assert_eq!(estimate_one_rep_max(100.0, 0, formula), 0.0);
            assert_eq!(estimate_one_rep_max(0.0, 5, formula), 0.0);
            assert_eq!(estimate_one_rep_max(-20.0, 5, formula), 0.0);
        }
    }

    #[test]
    fn test_epley() {
        let one_rm = estimate_one_rep_max(100.0, 10, Formula::Epley);
        assert!((one_rm - 133.333).abs() < 0.01, "Epley: {}", one_rm);
    }

    #[test]
    fn test_brzycki() {
        let one_rm = estimate_one_rep_max(100.0, 10, Formula::Brzycki);
        assert!((one_rm - 133.333).abs() < 0.01, "Brzycki: {}", one_rm);
    }

    #[test]
    fn test_brzycki_caps_extreme_reps() {
        assert_eq!(estimate_one_rep_max(50.0, 37, Formula::Brzycki), 100.0);
        assert_eq!(estimate_one_rep_max(50.0, 60, Formula::Brzycki), 100.0);
    }

    #[test]
    fn test_lander() {
        let one_rm = estimate_one_rep_max(100.0, 10, Formula::Lander);
        assert!((one_rm - 134.07).abs() < 0.01, "Lander: {}", one_rm);
        // 101.3 / 2.67123 ~ 37.9, so 38 reps hits the cap
        assert_eq!(estimate_one_rep_max(50.0, 38, Formula::Lander), 100.0);
    }

    #[test]
    fn test_formula_from_name() {
        assert_eq!(Formula::from_name("brzycki"), Formula::Brzycki);
        assert_eq!(Formula::from_name("Lander"), Formula::Lander);
        assert_eq!(Formula::from_name("epley"), Formula::Epley);
        assert_eq!(Formula::from_name("mayhew"), Formula::Epley);
    }

    #[test]
    fn test_total_tonnage() {
        let sets = vec![
            SetRecord::new(100.0, 5),
            SetRecord::new(80.0, 8),
            SetRecord { weight: None, reps: Some(10), ..SetRecord::default() },
            SetRecord { weight: Some(60.0), reps: None, ..SetRecord::default() },
        ];
        assert_eq!(total_tonnage(&sets), 500.0 + 640.0);
        assert_eq!(total_tonnage(&[]), 0.0);
    }

    #[test]
    fn test_volume_summary_empty() {
        assert_eq!(volume_summary(&[]), VolumeSummary::default());
        let empty = volume_summary(&[]);
        assert_eq!(empty.total_sets, 0);
        assert_eq!(empty.tonnage, 0.0);
        assert_eq!(empty.avg_weight, 0.0);
    }

    #[test]
    fn test_volume_summary_skips_empty_fields_in_averages() {
        let sets = vec![
            SetRecord::new(100.0, 5),
            SetRecord::new(80.0, 7),
            SetRecord { weight: None, reps: Some(12), ..SetRecord::default() },
        ];
        let summary = volume_summary(&sets);
        assert_eq!(summary.total_sets, 3);
        assert_eq!(summary.total_reps, 24);
        assert_eq!(summary.tonnage, 1060.0);
        assert_eq!(summary.avg_weight, 90.0);
        assert_eq!(summary.avg_reps, 8.0);
    }

    #[test]
    fn test_intensity_percent() {
        assert_eq!(intensity_percent(80.0, 100.0), 80.0);
        assert_eq!(intensity_percent(120.0, 100.0), 100.0);
        assert_eq!(intensity_percent(80.0, 0.0), 0.0);
    }

    #[test]
    fn test_best_1rm_in_history() {
        let history = vec![session(0, 100.0, 5), session(7, 90.0, 10), session(14, 110.0, 1)];
        // 90 x 10 -> 120 beats 100 x 5 -> 116.67 and 110 x 1 -> 110
        assert!((best_1rm_in_history(&history) - 120.0).abs() < 1e-9);
        assert_eq!(best_1rm_in_history(&[]), 0.0);
    }

    #[test]
    fn test_average_rpe() {
        let mut sets = vec![SetRecord::new(100.0, 5), SetRecord::new(100.0, 5), SetRecord::new(100.0, 4)];
        assert_eq!(average_rpe(&sets), None);

        sets[0].rpe = Some(7.0);
        sets[2].rpe = Some(9.0);
        assert_eq!(average_rpe(&sets), Some(8.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(133.3333, 1), 133.3);
        assert_eq!(round_to(-0.456, 1), -0.5);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(1.25, 1), 1.2);
        assert_eq!(round_to(1.75, 1), 1.8);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(101.25 - 100.0, 1), 1.2);
    }

    #[test]
    fn test_formula_deserialize_falls_back_to_epley() {
        let parsed: Vec<Formula> = serde_json::from_str(r#"["lander", "Brzycki", "mayhew"]"#).unwrap();
        assert_eq!(parsed, vec![Formula::Lander, Formula::Brzycki, Formula::Epley]);
        assert_eq!(serde_json::to_string(&Formula::Brzycki).unwrap(), "\"brzycki\"");
    }
}
