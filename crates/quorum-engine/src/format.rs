//! Display renderings of instants, zones, and durations.
//!
//! Everything here is presentation. In particular, this module is the
//! only place a broken timezone may quietly degrade: the `_or_utc`
//! fallback and the zero-offset label exist so a display never goes
//! blank, while the translation and roster paths keep failing loudly.

use chrono::{DateTime, Offset, Utc};
use log::warn;

use crate::error::Result;
use crate::offset::parse_timezone;

/// Display pattern matching the web client: `Mar 10, 2024, 10:00 AM EDT`.
const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p %Z";

/// Render an instant in a zone for display.
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvableTimezone`] if `tz` fails to
/// resolve.
///
/// [`ScheduleError::UnresolvableTimezone`]: crate::error::ScheduleError::UnresolvableTimezone
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use quorum_engine::format::format_in_zone;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
/// let text = format_in_zone(at, "America/New_York").unwrap();
/// assert_eq!(text, "Mar 10, 2024, 10:00 AM EDT");
/// ```
pub fn format_in_zone(instant: DateTime<Utc>, tz: &str) -> Result<String> {
    let tz = parse_timezone(tz)?;
    Ok(instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string())
}

/// Render an instant in a zone, falling back to UTC if the zone is
/// broken.
///
/// Display-only escape hatch: a member profile with a corrupt timezone
/// still gets a readable (UTC) rendering. Computation paths never do
/// this.
pub fn format_in_zone_or_utc(instant: DateTime<Utc>, tz: &str) -> String {
    match format_in_zone(instant, tz) {
        Ok(text) => text,
        Err(e) => {
            warn!("display falling back to UTC: {e}");
            instant.format(DISPLAY_FORMAT).to_string()
        }
    }
}

/// English weekday of an instant in a zone, e.g. `Sunday`.
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvableTimezone`] if `tz` fails to
/// resolve.
///
/// [`ScheduleError::UnresolvableTimezone`]: crate::error::ScheduleError::UnresolvableTimezone
pub fn weekday_name(instant: DateTime<Utc>, tz: &str) -> Result<String> {
    let tz = parse_timezone(tz)?;
    Ok(instant.with_timezone(&tz).format("%A").to_string())
}

/// Picker label for a zone with its offset at `at`: `New York (UTC-04:00)`.
///
/// The city is the last segment of the IANA name with underscores turned
/// into spaces. The offset is read at `at`, so DST is reflected. A zone
/// that fails to resolve is labeled `(UTC+00:00)` rather than dropped
/// from a picker.
pub fn timezone_label(tz: &str, at: DateTime<Utc>) -> String {
    let city = tz.rsplit('/').next().unwrap_or(tz).replace('_', " ");
    let offset = match parse_timezone(tz) {
        Ok(zone) => at.with_timezone(&zone).offset().fix().local_minus_utc() / 60,
        Err(_) => 0,
    };
    format!("{city} (UTC{})", format_offset_minutes(offset))
}

/// `±HH:MM` rendering of an offset in minutes.
fn format_offset_minutes(minutes: i32) -> String {
    let sign = if minutes >= 0 { "+" } else { "-" };
    let abs = minutes.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
}

/// Compact duration rendering: `2d 3h`, `1h 30m`, `45m`.
///
/// Two adjacent units, largest first, matching how the web client shows
/// meeting lengths. Durations under an hour show minutes only.
pub fn format_duration_minutes(total_minutes: u32) -> String {
    let days = total_minutes / 1440;
    let hours = (total_minutes % 1440) / 60;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
