//! Error types for quorum-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Unresolvable timezone: {0}")]
    UnresolvableTimezone(String),

    #[error("Malformed slot key: {0}")]
    MalformedKey(String),

    #[error("Slot index out of range: day {day} of {days_per_week}, slot {slot} of {slots_per_day}")]
    IndexOutOfRange {
        day: i64,
        slot: i64,
        days_per_week: u32,
        slots_per_day: u32,
    },

    #[error("Invalid week geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid vote: {0}")]
    InvalidVote(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
