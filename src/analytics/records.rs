//! Personal record detection

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::metrics::round_to;
use crate::session::{chronological, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrKind {
    Weight,
    #[serde(rename = "estimated_1rm")]
    EstimatedOneRm,
}

/// A new all-time best
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrEvent {
    #[serde(rename = "type")]
    pub kind: PrKind,
    pub date: DateTime<Utc>,
    pub weight: f64,
    pub reps: u32,
    /// New best: the weight itself, or the estimated 1RM
    pub value: f64,
    pub previous: f64,
}

/// Running best of one tracked quantity
#[derive(Debug, Default)]
struct Best(f64);

impl Best {
    /// Record `candidate`, returning the previous best when it is beaten
    fn beat(&mut self, candidate: f64) -> Option<f64> {
        if candidate > self.0 {
            Some(std::mem::replace(&mut self.0, candidate))
        } else {
            None
        }
    }
}

/// Scan the history oldest-first and emit every weight and 1RM record.
///
/// Sets are visited in their recorded order and both trackers are checked
/// against each set before moving on, so a set that beats both bests emits
/// the weight record first. Undated sessions are skipped.
pub fn find_personal_records(history: &[SessionRecord]) -> Vec<PrEvent> {
    let mut best_weight = Best::default();
    let mut best_one_rm = Best::default();
    let mut events = Vec::new();

    for session in chronological(history) {
        let Some(date) = session.date else {
            continue;
        };

        for set in &session.sets {
            let weight = set.load();
            let reps = set.rep_count();

            if let Some(previous) = best_weight.beat(weight) {
                events.push(PrEvent {
                    kind: PrKind::Weight,
                    date,
                    weight,
                    reps,
                    value: weight,
                    previous,
                });
            }

            if let Some(previous) = best_one_rm.beat(set.one_rep_max()) {
                events.push(PrEvent {
                    kind: PrKind::EstimatedOneRm,
                    date,
                    weight,
                    reps,
                    value: round_to(set.one_rep_max(), 1),
                    previous: round_to(previous, 1),
                });
            }
        }
    }

    events
}
