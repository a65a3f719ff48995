//! Parse/validate boundary between loosely typed backend responses and the
//! typed model.
//!
//! Bad input is rejected one slot or one meeting at a time; the rest of the
//! response still parses. Every rejection is returned in [`Parsed::rejected`]
//! and logged at `warn`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SlotError};
use crate::model::{
    Availability, Booking, DayAvailability, Meeting, MeetingStatus, Participant, TimeSlot,
};

// ---------------------------------------------------------------------------
// Wire records, as the backend sends them
// ---------------------------------------------------------------------------

/// `{"start": "HH:MM", "end": "HH:MM"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub start: String,
    pub end: String,
}

/// `{"date": "YYYY-MM-DD", "slots": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDayRecord {
    pub date: String,
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub profile: Option<ProfileRecord>,
}

/// A participant as either a bare user id or a profile object. Anything else
/// is kept but ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantEntry {
    Id(String),
    Record(ParticipantRecord),
    Other(Value),
}

impl ParticipantEntry {
    fn to_participant(&self) -> Option<Participant> {
        match self {
            ParticipantEntry::Id(id) => Some(Participant {
                id: Some(id.clone()),
                email: None,
                name: None,
            }),
            ParticipantEntry::Record(record) => Some(Participant::from(record)),
            ParticipantEntry::Other(_) => None,
        }
    }
}

/// A meeting from the booking source.
///
/// Only `start` and `end` decide whether it blocks time; every other field is
/// optional and read leniently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub participants: Vec<ParticipantEntry>,
    pub created_by: Option<ParticipantEntry>,
    pub status: Option<String>,
    pub video_link: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse results
// ---------------------------------------------------------------------------

/// One piece of input that did not make it through the boundary.
#[derive(Debug)]
pub struct Rejected {
    /// Where the input was, e.g. `2024-06-01 slot 2` or `meeting m-17`.
    pub location: String,
    pub error: SlotError,
}

/// A parsed value plus whatever was rejected on the way.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub rejected: Vec<Rejected>,
}

impl<T> Parsed<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            rejected: Vec::new(),
        }
    }

    fn reject(&mut self, location: String, error: SlotError) {
        tracing::warn!(%location, %error, "rejected input");
        self.rejected.push(Rejected { location, error });
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` date key.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDate(s.to_string()))
}

/// Parse a time of day, `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| SlotError::InvalidSlotFormat(s.to_string()))
}

/// Parse an instant.
///
/// Accepts RFC 3339 (e.g., "2024-06-01T09:30:00.000Z"). Without an offset,
/// "2024-06-01T09:30:00", "2024-06-01T09:30:00.250" and "2024-06-01T09:30" are
/// read as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map(|ndt| ndt.and_utc())
        .map_err(|_| SlotError::InvalidInstant(s.to_string()))
}

/// Map a status string. Unknown values count as scheduled, so they block time.
pub fn parse_status(s: &str) -> MeetingStatus {
    match s.trim().to_ascii_lowercase().as_str() {
        "cancelled" | "canceled" => MeetingStatus::Cancelled,
        "completed" => MeetingStatus::Completed,
        _ => MeetingStatus::Scheduled,
    }
}

impl SlotRecord {
    pub fn to_slot(&self) -> Result<TimeSlot> {
        TimeSlot::new(parse_time(&self.start)?, parse_time(&self.end)?)
    }
}

impl From<&TimeSlot> for SlotRecord {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start: slot.start().format("%H:%M").to_string(),
            end: slot.end().format("%H:%M").to_string(),
        }
    }
}

impl From<&ParticipantRecord> for Participant {
    fn from(record: &ParticipantRecord) -> Self {
        Self {
            id: record.id.clone().or_else(|| record.object_id.clone()),
            email: record.email.clone(),
            name: record.profile.as_ref().and_then(|p| p.name.clone()),
        }
    }
}

impl MeetingRecord {
    pub fn to_meeting(&self) -> Result<Meeting> {
        let (Some(start), Some(end)) = (
            self.start.as_deref().filter(|s| !s.is_empty()),
            self.end.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(SlotError::MissingBookingTime);
        };
        let booking = Booking::new(parse_instant(start)?, parse_instant(end)?)?;

        Ok(Meeting {
            id: self.id.clone().filter(|id| !id.is_empty()),
            title: self
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            booking,
            participants: self
                .participants
                .iter()
                .filter_map(ParticipantEntry::to_participant)
                .collect(),
            created_by: self
                .created_by
                .as_ref()
                .and_then(ParticipantEntry::to_participant)
                .and_then(|p| p.id),
            status: self.status.as_deref().map(parse_status).unwrap_or_default(),
            video_link: self.video_link.clone().filter(|l| !l.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Build one participant's availability from day records.
pub fn parse_availability(records: &[AvailabilityDayRecord]) -> Parsed<Availability> {
    let mut parsed = Parsed::new(Availability::new());

    for record in records {
        let date = match parse_date(&record.date) {
            Ok(date) => date,
            Err(error) => {
                parsed.reject(format!("day {:?}", record.date), error);
                continue;
            }
        };

        let mut slots = Vec::with_capacity(record.slots.len());
        for (index, slot) in record.slots.iter().enumerate() {
            match slot.to_slot() {
                Ok(slot) => slots.push(slot),
                Err(error) => parsed.reject(format!("{} slot {}", date, index + 1), error),
            }
        }

        parsed.value.extend_day(DayAvailability { date, slots });
    }

    parsed
}

/// Build meetings from booking-source records.
pub fn parse_meetings(records: &[MeetingRecord]) -> Parsed<Vec<Meeting>> {
    let mut parsed = Parsed::new(Vec::with_capacity(records.len()));

    for (index, record) in records.iter().enumerate() {
        match record.to_meeting() {
            Ok(meeting) => parsed.value.push(meeting),
            Err(error) => {
                let location = match record.id.as_deref() {
                    Some(id) if !id.is_empty() => format!("meeting {}", id),
                    _ => format!("meeting #{}", index + 1),
                };
                parsed.reject(location, error);
            }
        }
    }

    parsed
}

/// Decode a response body into records, element by element.
///
/// A body that is not an array counts as empty (the backend answers errors
/// with an object). Only text that is not JSON fails.
pub fn records_from_json<T: DeserializeOwned>(json: &str) -> Result<Parsed<Vec<T>>> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
}

pub(crate) fn records_from_value<T: DeserializeOwned>(value: Value) -> Result<Parsed<Vec<T>>> {
    let Value::Array(items) = value else {
        tracing::debug!("response body is not an array, treating as empty");
        return Ok(Parsed::new(Vec::new()));
    };

    let mut parsed = Parsed::new(Vec::with_capacity(items.len()));
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(record) => parsed.value.push(record),
            Err(error) => parsed.reject(format!("element {}", index + 1), error.into()),
        }
    }
    Ok(parsed)
}

/// Decode and parse an availability response body.
pub fn availability_from_json(json: &str) -> Result<Parsed<Availability>> {
    let records = records_from_json::<AvailabilityDayRecord>(json)?;
    let parsed = parse_availability(&records.value);
    Ok(prepend_rejected(records.rejected, parsed))
}

/// Decode and parse a meetings response body.
pub fn meetings_from_json(json: &str) -> Result<Parsed<Vec<Meeting>>> {
    let records = records_from_json::<MeetingRecord>(json)?;
    let parsed = parse_meetings(&records.value);
    Ok(prepend_rejected(records.rejected, parsed))
}

fn prepend_rejected<T>(mut earlier: Vec<Rejected>, mut parsed: Parsed<T>) -> Parsed<T> {
    earlier.append(&mut parsed.rejected);
    parsed.rejected = earlier;
    parsed
}
