//! Wall-clock offsets between timezones at an explicit instant.
//!
//! Everything here takes the reference instant as an argument — there is
//! no system clock access. DST correctness falls out of asking the tz
//! database what each zone's UTC offset actually is at that instant,
//! instead of assuming a zone has one fixed offset.

use chrono::{DateTime, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::error::{Result, ScheduleError};

/// Parse an IANA timezone name into a [`Tz`].
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvableTimezone`] if the name is not in
/// the tz database. There is no fallback here: operations that move slots
/// around must fail loudly on a bad zone, not silently translate by zero.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ScheduleError::UnresolvableTimezone(format!("'{}'", s)))
}

/// Parse a datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with `Z` or a numeric offset). A naive
/// `YYYY-MM-DDTHH:MM:SS` string is accepted too and taken as UTC, since
/// stored records from earlier releases carry instants without a zone
/// marker.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDatetime`] if the string fits neither
/// shape.
pub fn parse_utc_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| ScheduleError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// A zone's UTC offset in minutes at an instant.
fn zone_offset_minutes(tz: &Tz, at: DateTime<Utc>) -> i32 {
    at.with_timezone(tz).offset().fix().local_minus_utc() / 60
}

/// Minutes by which `to_tz`'s wall clock leads `from_tz`'s at `at`.
///
/// Positive means `to_tz` shows a later wall time. Because the offsets
/// are read from the tz database at `at`, DST transitions on either side
/// are accounted for — New York against UTC is -240 in July and -300 in
/// January.
///
/// The raw difference is reduced to the shortest signed offset: anything
/// beyond ±720 minutes wraps around the 1440-minute day, so two zones are
/// never reported further than half a day apart. Exactly ±720 keeps its
/// sign, which keeps `offset_minutes(a, b, at) == -offset_minutes(b, a, at)`
/// true for every pair of zones.
///
/// # Arguments
///
/// * `from_tz` — IANA name of the zone the grid is currently expressed in
/// * `to_tz` — IANA name of the target zone
/// * `at` — the instant at which to compare the zones
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvableTimezone`] if either name fails to
/// resolve.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use quorum_engine::offset::offset_minutes;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
/// // Etc/GMT-2 is UTC+2 (POSIX sign convention).
/// assert_eq!(offset_minutes("UTC", "Etc/GMT-2", at).unwrap(), 120);
/// assert_eq!(offset_minutes("Etc/GMT-2", "UTC", at).unwrap(), -120);
/// ```
pub fn offset_minutes(from_tz: &str, to_tz: &str, at: DateTime<Utc>) -> Result<i32> {
    let from = parse_timezone(from_tz)?;
    let to = parse_timezone(to_tz)?;

    let mut diff = zone_offset_minutes(&to, at) - zone_offset_minutes(&from, at);

    // Shortest signed form. Raw UTC offsets span -12:00 to +14:00, so one
    // wrap in each direction covers the whole range.
    if diff > 720 {
        diff -= 1440;
    }
    if diff < -720 {
        diff += 1440;
    }

    debug!("wall-clock offset {from_tz} -> {to_tz} at {at}: {diff} minutes");
    Ok(diff)
}
