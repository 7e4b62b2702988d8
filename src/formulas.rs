//! Formula library for troop training and pack value calculations.
//!
//! Every function here is pure. Precondition violations are reported as
//! [`Error::InvalidInput`]; the two ratio helpers ([`efficiency_metrics`] and
//! [`cost_per_minute`]) instead define a zero result when the denominator is
//! zero.

use crate::error::{ensure_non_negative, Error, Result};
use crate::models::EfficiencyMetrics;

/// Applies a fractional training-time reduction to a base time.
///
/// # Arguments
///
/// * `base_time` - Base training time in minutes, finite and non-negative
/// * `reduction` - Reduction bonus as a fraction in `[0, 1]` (0.2 for 20%)
///
/// # Example
///
/// ```
/// use wosmax::formulas::effective_training_time;
///
/// assert_eq!(effective_training_time(300.0, 0.2).unwrap(), 240.0);
/// assert!(effective_training_time(300.0, 1.5).is_err());
/// ```
pub fn effective_training_time(base_time: f64, reduction: f64) -> Result<f64> {
    ensure_non_negative("base_time", base_time)?;
    if !reduction.is_finite() || !(0.0..=1.0).contains(&reduction) {
        return Err(Error::InvalidInput(format!(
            "reduction must be a fraction in [0, 1], got {reduction}"
        )));
    }
    Ok((base_time * (1.0 - reduction)).max(0.0))
}

/// Calculates how many whole batches fit into the available speed-ups and the
/// resulting point total.
///
/// A partially-filled batch earns nothing.
///
/// # Returns
///
/// `(batch_count, current_points + batch_count * points_per_batch)`
///
/// # Example
///
/// ```
/// use wosmax::formulas::batches_and_points;
///
/// assert_eq!(batches_and_points(1000.0, 60.0, 1000.0, 0.0).unwrap(), (16, 16000.0));
/// ```
pub fn batches_and_points(
    total_speedups: f64,
    time_per_batch: f64,
    points_per_batch: f64,
    current_points: f64,
) -> Result<(u64, f64)> {
    ensure_non_negative("total_speedups", total_speedups)?;
    ensure_non_negative("time_per_batch", time_per_batch)?;
    ensure_non_negative("points_per_batch", points_per_batch)?;
    ensure_non_negative("current_points", current_points)?;
    if time_per_batch == 0.0 {
        return Err(Error::InvalidInput(
            "time_per_batch must be greater than 0".to_string(),
        ));
    }

    let batches = (total_speedups / time_per_batch).floor() as u64;
    let total_points = batches as f64 * points_per_batch + current_points;
    Ok((batches, total_points))
}

/// Calculates points-per-minute, minutes-per-point and the normalized score.
///
/// When either input is zero all three metrics are zero.
///
/// ```
/// use wosmax::formulas::efficiency_metrics;
///
/// let m = efficiency_metrics(500.0, 1000.0).unwrap();
/// assert_eq!(m.points_per_minute, 2.0);
/// assert_eq!(m.time_per_point, 0.5);
/// assert_eq!(m.score, 200.0);
/// ```
pub fn efficiency_metrics(total_speedups: f64, total_points: f64) -> Result<EfficiencyMetrics> {
    ensure_non_negative("total_speedups", total_speedups)?;
    ensure_non_negative("total_points", total_points)?;
    if total_speedups == 0.0 || total_points == 0.0 {
        return Ok(EfficiencyMetrics::default());
    }

    let points_per_minute = total_points / total_speedups;
    Ok(EfficiencyMetrics {
        points_per_minute,
        time_per_point: total_speedups / total_points,
        score: points_per_minute * 100.0,
    })
}

/// Back-solves the speed-up minutes still needed to reach `target_points`.
///
/// Returns zero as soon as `current_points >= target_points`. A zero rate is a
/// malformed configuration and fails with [`Error::DivisionByZero`], unlike the
/// zero-guard in [`efficiency_metrics`].
pub fn speedups_needed(
    target_points: f64,
    points_per_batch: f64,
    current_points: f64,
    time_per_batch: f64,
) -> Result<f64> {
    if current_points >= target_points {
        return Ok(0.0);
    }
    if points_per_batch == 0.0 {
        return Err(Error::DivisionByZero("points_per_batch is zero"));
    }
    if time_per_batch == 0.0 {
        return Err(Error::DivisionByZero("time_per_batch is zero"));
    }

    let batches_needed = (target_points - current_points) / points_per_batch;
    Ok(batches_needed * time_per_batch)
}

/// Price per speed-up minute, rounded to 4 decimal places.
///
/// ```
/// use wosmax::formulas::cost_per_minute;
///
/// assert_eq!(cost_per_minute(15.0, 30.0), 0.5);
/// assert_eq!(cost_per_minute(15.0, 0.0), 0.0);
/// ```
pub fn cost_per_minute(price: f64, total_minutes: f64) -> f64 {
    if total_minutes <= 0.0 {
        return 0.0;
    }
    (price / total_minutes * 10_000.0).round() / 10_000.0
}

/// Minutes contained in a number of 60-minute and 5-minute speed-up items.
///
/// Negative counts pass through unchanged.
pub fn total_minutes_from_speedup_units(hour_count: i64, five_minute_count: i64) -> i64 {
    hour_count * 60 + five_minute_count * 5
}

/// Composes a days/hours/minutes/seconds timer into minutes.
pub fn training_minutes(days: u32, hours: u32, minutes: u32, seconds: u32) -> f64 {
    f64::from(days) * 24.0 * 60.0
        + f64::from(hours) * 60.0
        + f64::from(minutes)
        + f64::from(seconds) / 60.0
}
