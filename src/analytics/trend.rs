//! Least-squares linear trend over elapsed time

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::Serialize;

/// Fitted line y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, floored at 0
    pub r_squared: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form ordinary least squares.
///
/// Fewer than two points gives a flat line through the first value; no spread
/// in `x` gives a flat line through the mean of `y`.
pub fn fit_line(x: &[f64], y: &[f64]) -> LineFit {
    if x.len() < 2 || y.len() < 2 {
        return LineFit {
            slope: 0.0,
            intercept: y.first().copied().unwrap_or(0.0),
            r_squared: 0.0,
        };
    }

    let x = Array1::from(x.to_vec());
    let y = Array1::from(y.to_vec());

    let n = x.len() as f64;
    let sum_x = x.sum();
    let sum_y = y.sum();
    let sum_xy = x.dot(&y);
    let sum_x2 = x.dot(&x);
    let mean_y = y.mean().unwrap_or(0.0);

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return LineFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let predicted = &x * slope + intercept;
    let ss_res = (&y - &predicted).mapv(|r| r * r).sum();
    let ss_tot = y.mapv(|v| (v - mean_y).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    LineFit {
        slope,
        intercept,
        r_squared: r_squared.max(0.0),
    }
}

/// Whole days elapsed since `start`
pub fn days_since(start: DateTime<Utc>, date: DateTime<Utc>) -> f64 {
    (date - start).num_days() as f64
}

/// Trend of `values` against time; slope is per week since the earliest date
pub fn linear_trend(dates: &[DateTime<Utc>], values: &[f64]) -> LineFit {
    let Some(start) = dates.iter().min().copied() else {
        return fit_line(&[], values);
    };

    let weeks: Vec<f64> = dates.iter().map(|d| days_since(start, *d) / 7.0).collect();
    fit_line(&weeks, values)
}
