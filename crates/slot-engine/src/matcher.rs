//! Common free-slot matching between two participants.
//!
//! Performs pairwise comparison between both participants' slots for one date.
//! Each overlapping pair becomes a candidate; a candidate that touches any
//! booking is dropped whole. Adjacent intervals (one ends exactly when the
//! other starts) do NOT overlap.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::{resolve_local, DstPolicy};
use crate::error::{Result, SlotError};
use crate::model::{Availability, Booking, FreeSlot, TimeSlot};

/// How slot labels render a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelFormat {
    /// `09:30 - 10:00`
    #[default]
    TwentyFourHour,
    /// `09:30 AM - 10:00 AM`
    TwelveHour,
}

impl LabelFormat {
    fn pattern(self) -> &'static str {
        match self {
            LabelFormat::TwentyFourHour => "%H:%M",
            LabelFormat::TwelveHour => "%I:%M %p",
        }
    }
}

/// Matcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Zone the wall-clock slots are declared in. Also used for labels.
    pub timezone: Tz,
    pub dst_policy: DstPolicy,
    pub label_format: LabelFormat,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            dst_policy: DstPolicy::default(),
            label_format: LabelFormat::default(),
        }
    }
}

impl MatchOptions {
    /// Options for an IANA zone name such as `"Europe/Berlin"`.
    pub fn in_timezone(name: &str) -> Result<Self> {
        let timezone: Tz = name
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(name.to_string()))?;
        Ok(Self {
            timezone,
            ..Self::default()
        })
    }

    pub fn with_dst_policy(mut self, dst_policy: DstPolicy) -> Self {
        self.dst_policy = dst_policy;
        self
    }

    pub fn with_label_format(mut self, label_format: LabelFormat) -> Self {
        self.label_format = label_format;
        self
    }

    /// Render `start - end` in this zone.
    pub fn label(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        let pattern = self.label_format.pattern();
        format!(
            "{} - {}",
            start.with_timezone(&self.timezone).format(pattern),
            end.with_timezone(&self.timezone).format(pattern)
        )
    }

    fn instants(&self, date: NaiveDate, slot: &TimeSlot) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = resolve_local(date, slot.start(), self.timezone, self.dst_policy)?;
        let end = resolve_local(date, slot.end(), self.timezone, self.dst_policy)?;
        Some((start, end))
    }
}

/// Find the intervals on `date` where both participants are free and nothing
/// is booked.
///
/// Only `date`'s entry of each availability is consulted; a missing entry is
/// empty. See [`match_day`].
pub fn find_common_slots(
    date: NaiveDate,
    availability_a: &Availability,
    availability_b: &Availability,
    bookings: &[Booking],
    options: &MatchOptions,
) -> Vec<FreeSlot> {
    match_day(
        date,
        availability_a.day(date),
        availability_b.day(date),
        bookings,
        options,
    )
}

/// Match two slot lists for one date.
///
/// For every pair the overlap is `max(starts)..min(ends)`. An empty overlap
/// contributes nothing. An overlap that intersects any booking is discarded
/// entirely, with no carve-out of the free remainder. Results come out in
/// discovery order (A-major) and are neither merged nor deduplicated.
///
/// A slot whose local time cannot be resolved under the DST policy is skipped
/// and the remaining pairs are still matched.
pub fn match_day(
    date: NaiveDate,
    slots_a: &[TimeSlot],
    slots_b: &[TimeSlot],
    bookings: &[Booking],
    options: &MatchOptions,
) -> Vec<FreeSlot> {
    let resolve = |slots: &[TimeSlot]| -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        slots
            .iter()
            .filter_map(|slot| {
                let reason = match options.instants(date, slot) {
                    // A gap shift can collapse a short slot.
                    Some((start, end)) if start < end => return Some((start, end)),
                    Some(_) => "slot collapses after DST gap shift, skipping",
                    None => "slot falls in a DST gap, skipping",
                };
                tracing::warn!(
                    %date,
                    start = %slot.start(),
                    end = %slot.end(),
                    timezone = %options.timezone,
                    "{}",
                    reason
                );
                None
            })
            .collect()
    };

    let a = resolve(slots_a);
    let b = resolve(slots_b);
    let mut free = Vec::new();

    for &(a_start, a_end) in &a {
        for &(b_start, b_end) in &b {
            let start = a_start.max(b_start);
            let end = a_end.min(b_end);
            if start >= end {
                continue;
            }

            if bookings.iter().any(|booking| booking.overlaps(start, end)) {
                continue;
            }

            free.push(FreeSlot {
                start,
                end,
                duration_minutes: (end - start).num_minutes(),
                label: options.label(start, end),
            });
        }
    }

    tracing::debug!(
        %date,
        slots_a = slots_a.len(),
        slots_b = slots_b.len(),
        bookings = bookings.len(),
        free = free.len(),
        "matched availability"
    );

    free
}
