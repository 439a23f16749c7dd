//! Weekly training volume

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::session::SessionRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyVolume {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub workouts: u32,
    pub tonnage: f64,
    pub sets: usize,
    pub reps: u32,
}

impl WeeklyVolume {
    fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            workouts: 0,
            tonnage: 0.0,
            sets: 0,
            reps: 0,
        }
    }
}

/// Group dated sessions into Monday-based weeks, oldest week first
pub fn weekly_volume(history: &[SessionRecord]) -> Vec<WeeklyVolume> {
    let mut weeks: BTreeMap<NaiveDate, WeeklyVolume> = BTreeMap::new();

    for session in history {
        let Some(date) = session.date else {
            continue;
        };
        let day = date.date_naive();
        let week_start = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));

        let week = weeks
            .entry(week_start)
            .or_insert_with(|| WeeklyVolume::new(week_start));
        week.workouts += 1;
        week.tonnage += session.tonnage();
        week.sets += session.sets.len();
        week.reps += session.sets.iter().map(|s| s.rep_count()).sum::<u32>();
    }

    weeks.into_values().collect()
}
