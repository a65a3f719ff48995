//! Error types for slot-engine operations.

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid time of day: {0}")]
    InvalidSlotFormat(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Slot must end after it starts: {start} - {end}")]
    EmptySlot { start: NaiveTime, end: NaiveTime },

    #[error("Booking must end after it starts")]
    EmptyBooking,

    #[error("Meeting has no start or end time")]
    MissingBookingTime,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Cannot schedule a meeting with yourself")]
    SelfMeeting,

    #[error("Booking request needs a participant")]
    MissingParticipant,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
