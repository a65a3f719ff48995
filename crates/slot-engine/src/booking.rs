//! Request bodies for the external booking and availability endpoints.
//!
//! The core never sends these; it only shapes them from matcher output.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{Result, SlotError};
use crate::model::{FreeSlot, TimeSlot};
use crate::records::SlotRecord;

pub const DEFAULT_TITLE: &str = "Introduction Call";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotBounds {
    pub start: String,
    pub end: String,
}

impl SlotBounds {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.to_rfc3339_opts(SecondsFormat::Millis, true),
            end: end.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Body of the booking-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub participant_id: String,
    pub slot: SlotBounds,
    pub title: String,
}

impl BookingRequest {
    /// Book `slot` with `participant_id`. A blank title falls back to
    /// [`DEFAULT_TITLE`].
    pub fn for_slot(participant_id: &str, slot: &FreeSlot, title: Option<&str>) -> Result<Self> {
        let participant_id = participant_id.trim();
        if participant_id.is_empty() {
            return Err(SlotError::MissingParticipant);
        }
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        Ok(Self {
            participant_id: participant_id.to_string(),
            slot: SlotBounds::new(slot.start, slot.end),
            title: title.to_string(),
        })
    }
}

/// Body of the "add availability" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityUpdate {
    pub date: String,
    pub slots: Vec<SlotRecord>,
}

impl AvailabilityUpdate {
    pub fn single(date: NaiveDate, slot: &TimeSlot) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            slots: vec![SlotRecord::from(slot)],
        }
    }
}
