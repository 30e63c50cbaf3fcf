//! Per-member local renderings of a single UTC instant.
//!
//! Given a proposed meeting instant, every member of the roster sees it
//! at a different wall time. This module fans one instant out across a
//! roster, keeping each member's result (or failure) separate: one member
//! with a broken timezone must not take down the rest of the page.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::grid::AvailabilityGrid;
use crate::offset::parse_timezone;

/// A team member and their scheduling profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    /// IANA timezone the member's availability grid is expressed in.
    pub timezone: String,
    #[serde(default)]
    pub availability: AvailabilityGrid,
}

/// One member's view of a proposed instant.
///
/// Exactly one of `local_datetime`/`error` is populated: either the
/// member's zone resolved and `local_datetime` + `weekday` carry the
/// local rendering, or it did not and `error` says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub member_id: String,
    pub name: String,
    pub timezone: String,
    /// RFC 3339 rendering in the member's zone, e.g. `2024-03-10T10:00:00-04:00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_datetime: Option<String>,
    /// English weekday of the local rendering, e.g. `Sunday`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render `instant` in every roster member's local timezone.
///
/// Output order follows roster order. A member whose timezone fails to
/// resolve yields an error entry; the batch itself never fails.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use quorum_engine::roster::{resolve_for_roster, Member};
///
/// let members = vec![Member {
///     id: "m1".to_string(),
///     name: "Ana".to_string(),
///     timezone: "America/Sao_Paulo".to_string(),
///     availability: Default::default(),
/// }];
/// let instant = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
/// let roster = resolve_for_roster(instant, &members);
/// assert_eq!(roster[0].local_datetime.as_deref(), Some("2024-03-10T11:00:00-03:00"));
/// assert_eq!(roster[0].weekday.as_deref(), Some("Sunday"));
/// ```
pub fn resolve_for_roster(instant: DateTime<Utc>, members: &[Member]) -> Vec<RosterEntry> {
    members
        .iter()
        .map(|member| {
            let mut entry = RosterEntry {
                member_id: member.id.clone(),
                name: member.name.clone(),
                timezone: member.timezone.clone(),
                local_datetime: None,
                weekday: None,
                error: None,
            };
            match parse_timezone(&member.timezone) {
                Ok(tz) => {
                    let local = instant.with_timezone(&tz);
                    entry.local_datetime = Some(local.to_rfc3339());
                    entry.weekday = Some(local.format("%A").to_string());
                }
                Err(e) => {
                    warn!("roster entry for member {} failed: {e}", member.id);
                    entry.error = Some(e.to_string());
                }
            }
            entry
        })
        .collect()
}
