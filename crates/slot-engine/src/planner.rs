//! Proposes common slots for the session user and one other participant.

use chrono::NaiveDate;

use crate::backend::SchedulingBackend;
use crate::error::{Result, SlotError};
use crate::matcher::{find_common_slots, MatchOptions};
use crate::model::{Booking, FreeSlot, Meeting, MeetingStatus};
use crate::records::{
    parse_availability, parse_meetings, records_from_value, AvailabilityDayRecord, MeetingRecord,
    Rejected,
};
use crate::session::Session;

/// Result of one planning query.
#[derive(Debug)]
pub struct Proposal {
    pub date: NaiveDate,
    pub participant_id: String,
    /// Bookable slots, in discovery order.
    pub slots: Vec<FreeSlot>,
    /// The session user's meetings, as parsed.
    pub meetings: Vec<Meeting>,
    /// Input dropped at the parse boundary.
    pub rejected: Vec<Rejected>,
}

impl Proposal {
    /// 1-based pick, as shown to a user.
    pub fn pick(&self, number: usize) -> Option<&FreeSlot> {
        number.checked_sub(1).and_then(|i| self.slots.get(i))
    }
}

/// Fetch both participants' availability and the session user's meetings,
/// then match them for `date`.
///
/// Any meeting with a valid start and end blocks time, whatever its other
/// fields hold, except cancelled meetings: those do not occupy time. The
/// scheduling page this replaces blocked cancelled meetings too.
pub fn propose_slots<B: SchedulingBackend + ?Sized>(
    backend: &B,
    session: &Session,
    participant_id: &str,
    date: NaiveDate,
    options: &MatchOptions,
) -> Result<Proposal> {
    if participant_id == session.user_id() {
        return Err(SlotError::SelfMeeting);
    }

    let mut rejected = Vec::new();

    let mine = records_from_value::<AvailabilityDayRecord>(
        backend.availability(session, session.user_id())?,
    )?;
    rejected.extend(mine.rejected);
    let mine = parse_availability(&mine.value);
    rejected.extend(mine.rejected);

    let theirs =
        records_from_value::<AvailabilityDayRecord>(backend.availability(session, participant_id)?)?;
    rejected.extend(theirs.rejected);
    let theirs = parse_availability(&theirs.value);
    rejected.extend(theirs.rejected);

    let meetings = records_from_value::<MeetingRecord>(backend.meetings(session)?)?;
    rejected.extend(meetings.rejected);
    let meetings = parse_meetings(&meetings.value);
    rejected.extend(meetings.rejected);

    let bookings: Vec<Booking> = meetings
        .value
        .iter()
        .filter(|m| m.status != MeetingStatus::Cancelled)
        .map(|m| m.booking)
        .collect();

    let slots = find_common_slots(date, &mine.value, &theirs.value, &bookings, options);

    tracing::info!(
        user = session.user_id(),
        participant = participant_id,
        %date,
        slots = slots.len(),
        rejected = rejected.len(),
        "proposed common slots"
    );

    Ok(Proposal {
        date,
        participant_id: participant_id.to_string(),
        slots,
        meetings: meetings.value,
        rejected,
    })
}
