//! 1RM trajectory - regression over per-session best 1RM, projected forward

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use super::metrics::round_to;
use super::trend::{days_since, fit_line};
use super::Confidence;
use crate::session::{chronological, SessionRecord};

/// Fit quality above which the projection is trusted
const HIGH_CONFIDENCE_R2: f64 = 0.7;
const MEDIUM_CONFIDENCE_R2: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OneRmPoint {
    pub date: DateTime<Utc>,
    pub one_rm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryResult {
    pub historical: Vec<OneRmPoint>,
    pub projected: Vec<OneRmPoint>,
    pub current_1rm: f64,
    pub projected_1rm: f64,
    pub weekly_gain: f64,
    pub r_squared: f64,
    pub confidence: Confidence,
}

/// Project estimated 1RM `weeks_forward` weeks past the latest session.
///
/// The regression runs against days since the first session, so the slope is
/// per day; `weekly_gain` reports it per week.
pub fn project_1rm(history: &[SessionRecord], weeks_forward: u32) -> TrajectoryResult {
    let points: Vec<OneRmPoint> = chronological(history)
        .into_iter()
        .filter_map(|s| {
            let date = s.date?;
            let one_rm = s.best_one_rep_max();
            (one_rm > 0.0).then_some(OneRmPoint { date, one_rm })
        })
        .collect();

    let historical: Vec<OneRmPoint> = points
        .iter()
        .map(|p| OneRmPoint {
            date: p.date,
            one_rm: round_to(p.one_rm, 1),
        })
        .collect();
    let current_1rm = historical.last().map(|p| p.one_rm).unwrap_or(0.0);

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return insufficient(historical, current_1rm);
    };
    if points.len() < 2 {
        debug!(points = points.len(), "not enough sessions for a 1RM trajectory");
        return insufficient(historical, current_1rm);
    }

    let start = first.date;
    let x: Vec<f64> = points.iter().map(|p| days_since(start, p.date)).collect();
    let y: Vec<f64> = points.iter().map(|p| p.one_rm).collect();
    let fit = fit_line(&x, &y);

    // Stops early once the date range runs out
    let projected: Vec<OneRmPoint> = (1..=i64::from(weeks_forward))
        .map_while(|week| {
            let date = last.date.checked_add_signed(Duration::try_weeks(week)?)?;
            let one_rm = fit.predict(days_since(start, date)).max(0.0);
            Some(OneRmPoint {
                date,
                one_rm: round_to(one_rm, 1),
            })
        })
        .collect();

    let confidence = if fit.r_squared > HIGH_CONFIDENCE_R2 {
        Confidence::High
    } else if fit.r_squared > MEDIUM_CONFIDENCE_R2 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    debug!(slope_per_day = fit.slope, r_squared = fit.r_squared, ?confidence, "1RM trajectory");

    TrajectoryResult {
        projected_1rm: projected.last().map(|p| p.one_rm).unwrap_or(0.0),
        historical,
        projected,
        current_1rm,
        weekly_gain: round_to(fit.slope * 7.0, 2),
        r_squared: round_to(fit.r_squared, 3),
        confidence,
    }
}

fn insufficient(historical: Vec<OneRmPoint>, current_1rm: f64) -> TrajectoryResult {
    TrajectoryResult {
        historical,
        projected: Vec::new(),
        current_1rm,
        projected_1rm: 0.0,
        weekly_gain: 0.0,
        r_squared: 0.0,
        confidence: Confidence::Low,
    }
}
