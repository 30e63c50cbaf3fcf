//! In-memory repositories for records the engine operates on.
//!
//! The computation functions all take plain data; these stores are the
//! injected capability a thin outer layer (CLI, service) uses to hold
//! that data between calls. Anything with real durability lives behind
//! the same surface.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::meeting::{Meeting, Team};
use crate::roster::Member;
use crate::vote::{submit_vote, Vote, VoteSubmission};

/// Records addressable by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Member {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Team {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Meeting {
    fn key(&self) -> &str {
        &self.id
    }
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

/// Thread-safe keyed store with clone-out reads.
pub struct MemoryStore<T> {
    records: Mutex<BTreeMap<String, T>>,
}

impl<T: Keyed + Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    // A poisoned lock means another thread panicked mid-call; the map is
    // still coherent because every mutation is a single insert or remove.
    fn locked(&self) -> MutexGuard<'_, BTreeMap<String, T>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.locked().get(key).cloned()
    }

    /// All records in key order.
    pub fn list(&self) -> Vec<T> {
        self.locked().values().cloned().collect()
    }

    /// Insert or replace by the record's own key; returns the replaced
    /// record if there was one.
    pub fn upsert(&self, record: T) -> Option<T> {
        self.locked().insert(record.key().to_string(), record)
    }

    pub fn delete(&self, key: &str) -> Option<T> {
        self.locked().remove(key)
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }
}

impl<T: Keyed + Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── VoteLedger ──────────────────────────────────────────────────────────────

/// The vote collection behind one lock.
///
/// [`submit_vote`] is remove-then-append; holding the lock across both
/// halves keeps concurrent submissions from ever leaving a member with
/// zero or two live votes on a meeting.
pub struct VoteLedger {
    votes: Mutex<Vec<Vote>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self {
            votes: Mutex::new(Vec::new()),
        }
    }

    fn locked(&self) -> MutexGuard<'_, Vec<Vote>> {
        match self.votes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Accept a vote; see [`submit_vote`] for the semantics.
    ///
    /// # Errors
    ///
    /// Propagates [`submit_vote`]'s validation errors. The ledger is
    /// untouched on error.
    pub fn submit(&self, submission: VoteSubmission, now: DateTime<Utc>) -> Result<Vote> {
        let mut votes = self.locked();
        submit_vote(&mut votes, submission, now)
    }

    /// Live votes for one meeting, in submission order.
    pub fn votes_for(&self, meeting_id: &str) -> Vec<Vote> {
        self.locked()
            .iter()
            .filter(|v| v.meeting_id == meeting_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }
}

impl Default for VoteLedger {
    fn default() -> Self {
        Self::new()
    }
}
