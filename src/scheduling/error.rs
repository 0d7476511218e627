use thiserror::Error;

/// Malformed input handed to the scheduler.
///
/// These are caller bugs, not business rejections; business outcomes are
/// reported through [`super::Verdict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("service duration must be at least one minute")]
    InvalidDuration,

    #[error("appointment starting at {start} for {duration_minutes} minutes would cross midnight")]
    CrossesMidnight { start: String, duration_minutes: u32 },

    #[error("working hours for day {day_of_week} are invalid: {reason}")]
    InvalidWorkingHours { day_of_week: u8, reason: String },

    #[error("working hours are for day {supplied} but the requested date falls on day {expected}")]
    WeekdayMismatch { expected: u8, supplied: u8 },
}
