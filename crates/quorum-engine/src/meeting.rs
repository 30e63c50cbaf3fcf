//! Meeting records, the meeting lifecycle, and voting windows.
//!
//! Records here mirror the stored JSON shape (camelCase fields, instants
//! as strings). Typed accessors parse instants on demand so records
//! written by earlier releases, some with naive timestamps, still load.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::offset::parse_utc_instant;

// ── Records ─────────────────────────────────────────────────────────────────

/// One proposed meeting time a roster can vote on.
///
/// `time_slot` is an opaque candidate identifier — a slot key or an ISO
/// instant, the engine never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingCandidate {
    pub time_slot: String,
    pub duration_minutes: u32,
}

/// A meeting, either pinned to a time or open for voting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    /// Candidates on the ballot while the meeting is in voting.
    #[serde(default)]
    pub time_slots: Vec<MeetingCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_end: Option<String>,
    pub duration_minutes: u32,
    /// Zone the organizer proposed the meeting in; display only.
    pub timezone: String,
    pub status: MeetingStatus,
}

impl Meeting {
    /// The meeting's voting window, if both bounds are set.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDatetime`] if a bound is present
    /// but unparseable.
    pub fn voting_window(&self) -> Result<Option<VotingWindow>> {
        match (&self.voting_start, &self.voting_end) {
            (Some(start), Some(end)) => Ok(Some(VotingWindow {
                start: parse_utc_instant(start)?,
                end: parse_utc_instant(end)?,
            })),
            _ => Ok(None),
        }
    }
}

/// A group of members whose availability is compared together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

// ── Lifecycle ───────────────────────────────────────────────────────────────

/// Lifecycle state of a meeting.
///
/// A meeting is created `scheduled` (pinned to a time) or moved into
/// `voting` to let the roster pick. Voting resolves back to `scheduled`
/// once a time is picked, or to `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Voting,
    Cancelled,
}

impl MeetingStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: MeetingStatus) -> bool {
        matches!(
            (self, next),
            (MeetingStatus::Scheduled, MeetingStatus::Voting)
                | (MeetingStatus::Voting, MeetingStatus::Scheduled)
                | (MeetingStatus::Voting, MeetingStatus::Cancelled)
        )
    }
}

// ── Voting window ───────────────────────────────────────────────────────────

/// The interval during which votes are accepted, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl VotingWindow {
    /// Whether `now` falls inside the window. A vote cast exactly at the
    /// opening or closing instant counts.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.start && now <= self.end
    }
}

/// Candidate instants between `start` and `end`, stepping by
/// `step_minutes`.
///
/// An instant is included while the whole meeting still fits:
/// `instant + step <= end`. Returns an empty list when nothing fits.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDuration`] if `step_minutes` is zero.
pub fn candidate_instants(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_minutes: u32,
) -> Result<Vec<DateTime<Utc>>> {
    if step_minutes == 0 {
        return Err(ScheduleError::InvalidDuration(
            "candidate step must be nonzero".to_string(),
        ));
    }
    let step = Duration::minutes(i64::from(step_minutes));
    let mut instants = Vec::new();
    let mut current = start;
    while current + step <= end {
        instants.push(current);
        current += step;
    }
    Ok(instants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> VotingWindow {
        VotingWindow {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_window_open_strictly_inside() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        assert!(window().is_open_at(now));
    }

    #[test]
    fn test_window_inclusive_at_both_bounds() {
        assert!(window().is_open_at(window().start));
        assert!(window().is_open_at(window().end));
    }

    #[test]
    fn test_window_closed_outside() {
        let before = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 1).unwrap();
        assert!(!window().is_open_at(before));
        assert!(!window().is_open_at(after));
    }

    #[test]
    fn test_status_transitions() {
        use MeetingStatus::*;
        assert!(Scheduled.can_transition_to(Voting));
        assert!(Voting.can_transition_to(Scheduled));
        assert!(Voting.can_transition_to(Cancelled));

        assert!(!Scheduled.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Scheduled));
        assert!(!Cancelled.can_transition_to(Voting));
        assert!(!Scheduled.can_transition_to(Scheduled));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MeetingStatus::Scheduled).unwrap(),
            r#""scheduled""#
        );
        let status: MeetingStatus = serde_json::from_str(r#""voting""#).unwrap();
        assert_eq!(status, MeetingStatus::Voting);
    }

    #[test]
    fn test_meeting_voting_window_parses_stored_strings() {
        let meeting = Meeting {
            id: "mt1".to_string(),
            title: "planning".to_string(),
            time_slots: vec![],
            scheduled_time: None,
            // Naive stored form from an earlier release: taken as UTC.
            voting_start: Some("2024-03-01T00:00:00".to_string()),
            voting_end: Some("2024-03-08T00:00:00Z".to_string()),
            duration_minutes: 60,
            timezone: "UTC".to_string(),
            status: MeetingStatus::Voting,
        };
        let parsed = meeting.voting_window().unwrap().unwrap();
        assert_eq!(parsed, window());
    }

    #[test]
    fn test_meeting_without_window_bounds_has_no_window() {
        let meeting = Meeting {
            id: "mt1".to_string(),
            title: "standup".to_string(),
            time_slots: vec![],
            scheduled_time: Some("2024-03-10T14:00:00Z".to_string()),
            voting_start: None,
            voting_end: None,
            duration_minutes: 30,
            timezone: "UTC".to_string(),
            status: MeetingStatus::Scheduled,
        };
        assert!(meeting.voting_window().unwrap().is_none());
    }

    #[test]
    fn test_meeting_serde_shape() {
        let json = r#"{
            "id": "mt1",
            "title": "retro",
            "timeSlots": [{"timeSlot": "2024-03-11T10:00:00Z", "durationMinutes": 60}],
            "votingStart": "2024-03-01T00:00:00Z",
            "votingEnd": "2024-03-08T00:00:00Z",
            "durationMinutes": 60,
            "timezone": "Europe/London",
            "status": "voting"
        }"#;
        let meeting: Meeting = serde_json::from_str(json).unwrap();
        assert_eq!(meeting.time_slots.len(), 1);
        assert_eq!(meeting.time_slots[0].duration_minutes, 60);
        assert_eq!(meeting.status, MeetingStatus::Voting);

        let out = serde_json::to_string(&meeting).unwrap();
        assert!(out.contains(r#""timeSlots""#), "got: {out}");
        assert!(!out.contains("scheduledTime"), "got: {out}");
    }

    #[test]
    fn test_candidate_instants_step_through_the_range() {
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 11, 13, 0, 0).unwrap();
        let instants = candidate_instants(start, end, 60).unwrap();
        assert_eq!(
            instants,
            vec![
                start,
                Utc.with_ymd_and_hms(2024, 3, 11, 11, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_candidate_instants_empty_when_nothing_fits() {
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 11, 10, 30, 0).unwrap();
        assert!(candidate_instants(start, end, 60).unwrap().is_empty());
        // Inverted range fits nothing either.
        assert!(candidate_instants(end, start, 30).unwrap().is_empty());
    }

    #[test]
    fn test_candidate_instants_rejects_zero_step() {
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 11, 13, 0, 0).unwrap();
        let err = candidate_instants(start, end, 0).unwrap_err().to_string();
        assert!(err.contains("Invalid duration"), "got: {err}");
    }
}
