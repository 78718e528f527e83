use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type WindowResult<T> = Result<T, WindowError>;

/// Reasons a requested simulation window cannot be represented.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    #[error("start_date must be in YYYY-MM-DD format (got '{input}')")]
    MalformedDate { input: String },

    #[error("number of days must be positive (got {days})")]
    NonPositiveDays { days: i64 },

    #[error("window starting {start_date} for {days} day(s) ends in a later year")]
    CrossesYear { start_date: String, days: i64 },
}
