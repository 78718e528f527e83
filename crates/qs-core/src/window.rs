//! Simulation window resolution.
//!
//! The solver runs in yearly mode, addressed by hour-of-year. A window is
//! described by a calendar start date and a number of whole days and must stay
//! inside the start date's year.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::error::{WindowError, WindowResult};
use crate::timing::{STEPS_PER_DAY, step_duration, timestamp_sequence};

/// Immutable description of the time span a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationWindow {
    start_date: NaiveDate,
    day_count: u32,
    start_hour_of_year: u32,
    step_count: usize,
}

impl SimulationWindow {
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    /// Whole hours between January 1st 00:00 and the start date.
    pub fn start_hour_of_year(&self) -> u32 {
        self.start_hour_of_year
    }

    /// Total number of solver steps (`day_count * 96`).
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn step_duration(&self) -> chrono::Duration {
        step_duration()
    }

    pub fn steps_per_day(&self) -> usize {
        STEPS_PER_DAY
    }

    /// Instant of the last row (end of the last step).
    pub fn end_instant(&self) -> NaiveDateTime {
        self.start_date.and_time(chrono::NaiveTime::MIN)
            + chrono::Duration::days(i64::from(self.day_count))
    }

    /// Row timestamps for this window.
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        timestamp_sequence(self.start_date, self.step_count)
    }

    /// Directory label for persisted runs: `run_<YYYY-MM-DD>_<days>_days`.
    pub fn label(&self) -> String {
        format!(
            "run_{}_{}_days",
            self.start_date.format("%Y-%m-%d"),
            self.day_count
        )
    }
}

/// Resolve a `YYYY-MM-DD` start date and a day count into a window.
///
/// Fails when the date is malformed, the day count is not positive, or the
/// end of the window (midnight after the last simulated day) lies in a later
/// year than the start date.
pub fn resolve_window(start_date: &str, day_count: i64) -> WindowResult<SimulationWindow> {
    let date = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").map_err(|_| {
        WindowError::MalformedDate {
            input: start_date.to_string(),
        }
    })?;

    if day_count <= 0 {
        return Err(WindowError::NonPositiveDays { days: day_count });
    }

    let crosses = || WindowError::CrossesYear {
        start_date: date.format("%Y-%m-%d").to_string(),
        days: day_count,
    };

    let days = u32::try_from(day_count).map_err(|_| crosses())?;
    let end_date = date
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(crosses)?;
    if end_date.year() != date.year() {
        return Err(crosses());
    }

    Ok(SimulationWindow {
        start_date: date,
        day_count: days,
        start_hour_of_year: date.ordinal0() * 24,
        step_count: days as usize * STEPS_PER_DAY,
    })
}
