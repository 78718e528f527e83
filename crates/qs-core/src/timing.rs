//! Fixed step resolution and timestamp generation.
//!
//! Every run advances in 15-minute steps. A row produced by the step loop
//! describes the state at the *end* of its interval, so the first timestamp
//! of a run is one step after midnight of the start date.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Minutes per simulation step.
pub const STEP_MINUTES: i64 = 15;

/// Steps per simulated day (24 h * 4 steps/h).
pub const STEPS_PER_DAY: usize = 96;

/// Stepsize directive understood by the solver (`stepsize=15m`).
pub const STEPSIZE_DIRECTIVE: &str = "15m";

/// Duration of one simulation step.
pub fn step_duration() -> Duration {
    Duration::minutes(STEP_MINUTES)
}

/// Timestamp of the first row of a run starting on `start_date`.
pub fn first_timestamp(start_date: NaiveDate) -> NaiveDateTime {
    start_date.and_time(NaiveTime::MIN) + step_duration()
}

/// Evenly spaced timestamps for `count` rows of a run starting on `start_date`.
pub fn timestamp_sequence(start_date: NaiveDate, count: usize) -> Vec<NaiveDateTime> {
    let step = step_duration();
    let mut ts = first_timestamp(start_date);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(ts);
        ts += step;
    }
    out
}
