//! GPS seconds of week arithmetic
use crate::{
    constants::{GPS_WEEK_SECONDS, HALF_WEEK_SECONDS},
    prelude::{Epoch, TimeScale},
};

/// Wraps a time difference (s) into [-302400, 302400],
/// to account for the week rollover between both instants.
pub fn wrap_week_seconds(dt_s: f64) -> f64 {
    if dt_s > HALF_WEEK_SECONDS {
        dt_s - GPS_WEEK_SECONDS
    } else if dt_s < -HALF_WEEK_SECONDS {
        dt_s + GPS_WEEK_SECONDS
    } else {
        dt_s
    }
}

/// Absolute distance (s) between two seconds of week instants,
/// accounting for week rollover.
pub fn week_distance(lhs_s: f64, rhs_s: f64) -> f64 {
    let dt = (lhs_s - rhs_s).abs();
    if dt > HALF_WEEK_SECONDS {
        GPS_WEEK_SECONDS - dt
    } else {
        dt
    }
}

/// Returns GPS seconds of week of this [Epoch]
pub fn gpst_seconds_of_week(t: Epoch) -> f64 {
    let (_, nanos) = t.to_time_scale(TimeScale::GPST).to_time_of_week();
    nanos as f64 * 1.0E-9
}

/// Builds a GPST [Epoch] from a (week, seconds of week) pair
pub fn gpst_epoch(week: u32, sow: f64) -> Epoch {
    let nanos = (sow * 1.0E9).round().max(0.0) as u64;
    Epoch::from_time_of_week(week, nanos, TimeScale::GPST)
}
