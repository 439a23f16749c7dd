//! Session records - the training history every analytics component consumes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::metrics::{average_rpe, estimate_one_rep_max, total_tonnage, Formula};

/// A single performed set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub rpe: Option<f64>,
    /// Tie-break key within a session
    pub order: Option<i64>,
}

impl SetRecord {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self {
            weight: Some(weight),
            reps: Some(reps),
            ..Self::default()
        }
    }

    /// Weight used in derived math: missing or non-positive counts as 0
    pub fn load(&self) -> f64 {
        self.weight.filter(|w| *w > 0.0).unwrap_or(0.0)
    }

    /// Reps used in derived math: missing counts as 0
    pub fn rep_count(&self) -> u32 {
        self.reps.unwrap_or(0)
    }

    /// Epley 1RM for this set, 0 unless both weight and reps are positive
    pub fn one_rep_max(&self) -> f64 {
        estimate_one_rep_max(self.load(), self.rep_count(), Formula::Epley)
    }
}

/// One exercise's worth of work inside a training session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
    /// Precomputed tonnage, if the source already stores it
    pub tonnage: Option<f64>,
    pub rpe_avg: Option<f64>,
}

impl SessionRecord {
    pub fn new(date: DateTime<Utc>, sets: Vec<SetRecord>) -> Self {
        Self {
            date: Some(date),
            sets,
            ..Self::default()
        }
    }

    /// Heaviest load lifted in the session (0 with no weighted sets)
    pub fn max_weight(&self) -> f64 {
        self.sets.iter().map(SetRecord::load).fold(0.0, f64::max)
    }

    /// Best per-set Epley 1RM in the session
    pub fn best_one_rep_max(&self) -> f64 {
        self.sets.iter().map(SetRecord::one_rep_max).fold(0.0, f64::max)
    }

    /// Cached tonnage when present, otherwise computed from the sets
    pub fn tonnage(&self) -> f64 {
        self.tonnage.unwrap_or_else(|| total_tonnage(&self.sets))
    }

    /// Session RPE: cached average, else the mean of set RPEs. Zero means unrated.
    pub fn rpe(&self) -> Option<f64> {
        self.rpe_avg
            .or_else(|| average_rpe(&self.sets))
            .filter(|rpe| *rpe != 0.0)
    }
}

/// Sessions ordered by date; undated sessions sort first, ties keep input order
pub fn chronological(history: &[SessionRecord]) -> Vec<&SessionRecord> {
    let mut sessions: Vec<_> = history.iter().collect();
    sessions.sort_by_key(|s| s.date);
    sessions
}

/// (date, session max weight) for dated sessions with a positive max, ascending by date
pub fn dated_maxima(history: &[SessionRecord]) -> Vec<(DateTime<Utc>, f64)> {
    chronological(history)
        .into_iter()
        .filter_map(|s| {
            let max_weight = s.max_weight();
            match s.date {
                Some(date) if max_weight > 0.0 => Some((date, max_weight)),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::{SessionRecord, SetRecord};

    /// Midnight UTC on the given calendar day
    pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    /// Session `days` after 2024-01-01 with one top set
    pub fn session(days: i64, weight: f64, reps: u32) -> SessionRecord {
        SessionRecord::new(day(2024, 1, 1) + Duration::days(days), vec![SetRecord::new(weight, reps)])
    }

    pub fn rated_session(days: i64, weight: f64, reps: u32, rpe: f64) -> SessionRecord {
        SessionRecord {
            rpe_avg: Some(rpe),
            ..session(days, weight, reps)
        }
    }
}
