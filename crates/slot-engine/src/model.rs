//! Strongly typed scheduling model.
//!
//! Everything here has already passed the parse boundary in [`crate::records`]:
//! slots have a positive length and bookings carry absolute instants.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A time-of-day interval declared free by one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    /// Build a slot. `end` must be strictly after `start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end <= start {
            return Err(SlotError::EmptySlot { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

/// One participant's slots for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

/// A participant's availability, keyed by calendar date.
///
/// Slots within a day keep insertion order. They are not sorted and may
/// overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    days: BTreeMap<NaiveDate, Vec<TimeSlot>>,
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect days into one availability. Repeated dates are appended.
    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = DayAvailability>,
    {
        let mut availability = Self::new();
        for day in days {
            availability.extend_day(day);
        }
        availability
    }

    /// Append a whole day's slots.
    pub fn extend_day(&mut self, day: DayAvailability) {
        self.days.entry(day.date).or_default().extend(day.slots);
    }

    /// Slots declared for `date`, or an empty slice.
    pub fn day(&self, date: NaiveDate) -> &[TimeSlot] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a slot to `date`, creating the day if needed.
    pub fn add_slot(&mut self, date: NaiveDate, slot: TimeSlot) {
        self.days.entry(date).or_default().push(slot);
    }

    /// Dates that have at least one slot, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(date, _)| *date)
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    pub fn slot_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Occupied time for a confirmed meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Booking {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Booking {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(SlotError::EmptyBooking);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Half-open overlap test. A booking that ends exactly at `start` does
    /// not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A meeting as reported by the booking source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meeting {
    pub id: Option<String>,
    pub title: String,
    pub booking: Booking,
    pub participants: Vec<Participant>,
    pub created_by: Option<String>,
    pub status: MeetingStatus,
    pub video_link: Option<String>,
}

impl Meeting {
    pub fn is_attended_by(&self, user_id: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.id.as_deref() == Some(user_id))
    }

    /// Video link, shown only to participants.
    pub fn join_link(&self, user_id: &str) -> Option<&str> {
        self.video_link
            .as_deref()
            .filter(|link| !link.is_empty() && self.is_attended_by(user_id))
    }
}

/// A mutually free, unbooked interval. Derived on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
    pub label: String,
}
