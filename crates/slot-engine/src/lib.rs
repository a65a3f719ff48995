//! # slot-engine
//!
//! Finds the time two people are both free on a given day, minus anything
//! already booked.
//!
//! Each participant declares availability as wall-clock slots per date. The
//! matcher intersects every pair of slots and drops any overlap that touches
//! an existing booking. Backend responses are validated at a parse boundary
//! first, so the matcher only ever sees typed input.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::records::parse_time;
//! use slot_engine::{find_common_slots, Availability, MatchOptions, TimeSlot};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let slot = |s, e| TimeSlot::new(parse_time(s).unwrap(), parse_time(e).unwrap()).unwrap();
//!
//! let mut mine = Availability::new();
//! mine.add_slot(date, slot("09:00", "10:00"));
//! let mut theirs = Availability::new();
//! theirs.add_slot(date, slot("09:30", "10:30"));
//!
//! let free = find_common_slots(date, &mine, &theirs, &[], &MatchOptions::default());
//! assert_eq!(free.len(), 1);
//! assert_eq!(free[0].label, "09:30 - 10:00");
//! ```
//!
//! ## Modules
//!
//! - [`model`] — `TimeSlot`, `Availability`, `Booking`, `Meeting`, `FreeSlot`
//! - [`matcher`] — pairwise intersection minus bookings
//! - [`dst`] — local-time resolution across DST transitions
//! - [`records`] — parse/validate boundary for backend responses
//! - [`session`] — explicit user session
//! - [`backend`] — `SchedulingBackend` trait and snapshot backend
//! - [`planner`] — fetch, parse and match in one call
//! - [`booking`] — request bodies for booking and availability updates
//! - [`error`] — Error types

pub mod backend;
pub mod booking;
pub mod dst;
pub mod error;
pub mod matcher;
pub mod model;
pub mod planner;
pub mod records;
pub mod session;

pub use backend::{SchedulingBackend, SnapshotBackend};
pub use booking::{AvailabilityUpdate, BookingRequest};
pub use dst::DstPolicy;
pub use error::SlotError;
pub use matcher::{find_common_slots, match_day, LabelFormat, MatchOptions};
pub use model::{Availability, Booking, DayAvailability, FreeSlot, Meeting, TimeSlot};
pub use planner::{propose_slots, Proposal};
pub use session::Session;
