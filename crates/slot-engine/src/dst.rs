//! DST transition policies for wall-clock availability.
//!
//! Availability is declared as local times of day. Turning those into instants
//! needs a rule for local times that do not exist (spring-forward gap) or exist
//! twice (fall-back overlap).

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Largest gap we walk across when shifting forward. No IANA zone has a
/// transition longer than this.
const MAX_GAP_MINUTES: i64 = 180;

/// Policy for slot boundaries that fall in a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DstPolicy {
    /// Drop the slot (e.g., 02:30 during spring forward does not exist)
    Skip,
    /// Move to the first valid local minute after the gap
    #[default]
    ShiftForward,
}

/// Resolve a local `date` + `time` in `tz` to a UTC instant.
///
/// Ambiguous local times resolve to the earlier instant. Returns `None` only
/// when the time falls in a gap and the policy is [`DstPolicy::Skip`].
pub fn resolve_local(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    let local = date.and_time(time);
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES)
                .map(|m| local + Duration::minutes(m))
                .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
                .map(|dt| dt.with_timezone(&Utc)),
        },
    }
}
