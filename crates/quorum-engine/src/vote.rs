//! Vote submission and tallying for meetings open to voting.
//!
//! One member holds at most one live vote per meeting: submitting again
//! replaces the earlier vote wholesale (filter then append), so "change
//! my vote" and "vote" are the same operation. Tallies are recomputed
//! from the vote collection on every request — nothing incremental to
//! drift out of sync.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::meeting::MeetingCandidate;

// ── Records ─────────────────────────────────────────────────────────────────

/// Strength a voter attaches to a candidate. Ordered, so the strongest
/// preference among counted votes can be kept per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Low,
    #[default]
    Medium,
    High,
}

/// A stored vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    pub meeting_id: String,
    pub user_id: String,
    /// Candidate identifier, matched verbatim against the ballot.
    pub time_slot: String,
    #[serde(default)]
    pub preference: Preference,
    pub created_at: DateTime<Utc>,
}

/// What a member sends when voting. Identifier and timestamp are added
/// on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSubmission {
    pub meeting_id: String,
    pub user_id: String,
    pub time_slot: String,
    #[serde(default)]
    pub preference: Preference,
}

/// Aggregated standing of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyEntry {
    pub votes: u32,
    /// Strongest preference among counted votes; `low` when none counted.
    pub preference: Preference,
    pub duration_minutes: u32,
}

/// Candidate identifier → standing, for every candidate on the ballot.
pub type TallyResult = BTreeMap<String, TallyEntry>;

// ── Operations ──────────────────────────────────────────────────────────────

/// Accept a vote, replacing any earlier vote by the same member on the
/// same meeting.
///
/// Validation happens before any mutation: on error the collection is
/// exactly as it was. On success the member's earlier votes for this
/// meeting are removed and the new vote is appended with a fresh id and
/// `created_at = now` — the engine never reads a wall clock itself.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidVote`] if `user_id` or `time_slot` is
/// blank.
pub fn submit_vote(
    votes: &mut Vec<Vote>,
    submission: VoteSubmission,
    now: DateTime<Utc>,
) -> Result<Vote> {
    if submission.user_id.trim().is_empty() {
        return Err(ScheduleError::InvalidVote(
            "userId must not be blank".to_string(),
        ));
    }
    if submission.time_slot.trim().is_empty() {
        return Err(ScheduleError::InvalidVote(
            "timeSlot must not be blank".to_string(),
        ));
    }

    let before = votes.len();
    votes.retain(|v| {
        !(v.meeting_id == submission.meeting_id && v.user_id == submission.user_id)
    });
    if votes.len() < before {
        debug!(
            "replacing earlier vote by {} on meeting {}",
            submission.user_id, submission.meeting_id
        );
    }

    let vote = Vote {
        id: Uuid::new_v4(),
        meeting_id: submission.meeting_id,
        user_id: submission.user_id,
        time_slot: submission.time_slot,
        preference: submission.preference,
        created_at: now,
    };
    votes.push(vote.clone());
    Ok(vote)
}

/// Tally votes for one meeting against its ballot.
///
/// Every candidate appears in the result, zero-votes included, so a
/// client can render the full ballot without joining back to the
/// meeting. A candidate with no counted votes reports `low` preference.
/// Votes naming a candidate that is not on the ballot are ignored, as
/// are votes for other meetings.
pub fn tally(meeting_id: &str, candidates: &[MeetingCandidate], votes: &[Vote]) -> TallyResult {
    let mut results: TallyResult = candidates
        .iter()
        .map(|c| {
            (
                c.time_slot.clone(),
                TallyEntry {
                    votes: 0,
                    preference: Preference::Low,
                    duration_minutes: c.duration_minutes,
                },
            )
        })
        .collect();

    for vote in votes.iter().filter(|v| v.meeting_id == meeting_id) {
        let Some(entry) = results.get_mut(&vote.time_slot) else {
            debug!(
                "ignoring vote {} for unknown candidate '{}'",
                vote.id, vote.time_slot
            );
            continue;
        };
        entry.votes += 1;
        entry.preference = entry.preference.max(vote.preference);
    }
    results
}

/// Ballot standings ordered for display: vote count descending, ties by
/// candidate identifier. Picking a winner stays with the caller.
pub fn ranked(results: &TallyResult) -> Vec<(&String, &TallyEntry)> {
    results
        .iter()
        .sorted_by(|(ka, ea), (kb, eb)| eb.votes.cmp(&ea.votes).then_with(|| ka.cmp(kb)))
        .collect()
}
