//! # quorum-engine
//!
//! Cross-timezone scheduling computation for distributed teams.
//!
//! The engine translates weekly availability grids between IANA
//! timezones (with day-boundary wraparound and DST-aware offsets),
//! renders proposed meeting instants in every roster member's local
//! time, and tallies votes over candidate meeting times. Every operation
//! takes its reference instant explicitly — nothing in here reads a
//! system clock.
//!
//! ## Modules
//!
//! - [`grid`] — Week geometry, slot-key codec, availability grids
//! - [`offset`] — Wall-clock offsets between zones at an instant
//! - [`translate`] — Availability-grid translation between zones
//! - [`roster`] — Per-member local renderings of a meeting instant
//! - [`meeting`] — Meeting records, lifecycle, voting windows
//! - [`vote`] — Vote submission and tallying
//! - [`format`] — Display renderings of instants, zones, durations
//! - [`store`] — In-memory repositories and the vote ledger
//! - [`error`] — Error types

pub mod error;
pub mod format;
pub mod grid;
pub mod meeting;
pub mod offset;
pub mod roster;
pub mod store;
pub mod translate;
pub mod vote;

pub use error::ScheduleError;
pub use format::{
    format_duration_minutes, format_in_zone, format_in_zone_or_utc, timezone_label, weekday_name,
};
pub use grid::{blank_grid, AvailabilityGrid, SlotKey, WeekGeometry};
pub use meeting::{
    candidate_instants, Meeting, MeetingCandidate, MeetingStatus, Team, VotingWindow,
};
pub use offset::{offset_minutes, parse_timezone, parse_utc_instant};
pub use roster::{resolve_for_roster, Member, RosterEntry};
pub use store::{Keyed, MemoryStore, VoteLedger};
pub use translate::translate_grid;
pub use vote::{
    ranked, submit_vote, tally, Preference, TallyEntry, TallyResult, Vote, VoteSubmission,
};
