//! Cross-timezone translation of weekly availability grids.
//!
//! A member keeps availability in their own timezone; comparing members
//! means re-expressing one grid in another zone. The shift is computed
//! once per translation from the wall-clock offset at an explicit
//! reference instant, converted to whole slots, and applied to every
//! available slot with week wraparound.

use chrono::{DateTime, Utc};
use log::{debug, trace};

use crate::error::Result;
use crate::grid::{AvailabilityGrid, SlotKey, WeekGeometry};
use crate::offset::offset_minutes;

/// Integer division rounding half away from zero.
///
/// `round(330 / 60) = 6` and `round(-330 / 60) = -6`, so a forward shift
/// and its reverse always cancel. The divisor comes from validated
/// geometry and is positive.
fn round_half_away(numer: i32, denom: i32) -> i32 {
    let quotient = numer / denom;
    let remainder = numer % denom;
    if 2 * remainder.abs() >= denom {
        quotient + numer.signum()
    } else {
        quotient
    }
}

/// Re-express an availability grid in another timezone.
///
/// The offset between the zones is resolved at `at`, rounded to a whole
/// number of slots (half away from zero), and added to every available
/// slot. Slots that cross midnight move to the neighboring day; days that
/// cross the week edge wrap around it. The result is a fresh grid holding
/// only `true` entries, rendered with canonical keys.
///
/// Input entries that are `false` are skipped without inspection, same as
/// absent keys. Every `true` entry must decode and sit inside `geometry`;
/// the first bad key aborts the whole translation, so a caller never sees
/// a partially translated grid.
///
/// Offsets that are not a whole multiple of the slot interval (for
/// example Asia/Kolkata's +05:30 on a 60-minute grid) are approximated by
/// the nearest whole slot.
///
/// # Errors
///
/// - [`ScheduleError::UnresolvableTimezone`] if either zone fails to resolve
/// - [`ScheduleError::InvalidGeometry`] for degenerate geometry
/// - [`ScheduleError::MalformedKey`] if an available slot's key fits neither
///   the canonical nor the legacy shape
/// - [`ScheduleError::IndexOutOfRange`] if an available slot sits outside
///   `geometry`
///
/// [`ScheduleError::UnresolvableTimezone`]: crate::error::ScheduleError::UnresolvableTimezone
/// [`ScheduleError::InvalidGeometry`]: crate::error::ScheduleError::InvalidGeometry
/// [`ScheduleError::MalformedKey`]: crate::error::ScheduleError::MalformedKey
/// [`ScheduleError::IndexOutOfRange`]: crate::error::ScheduleError::IndexOutOfRange
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use quorum_engine::grid::{AvailabilityGrid, WeekGeometry};
/// use quorum_engine::translate::translate_grid;
///
/// let mut grid = AvailabilityGrid::new();
/// grid.insert("day_0_slot_9".to_string(), true);
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
/// let translated =
///     translate_grid(&grid, "UTC", "Etc/GMT-2", &WeekGeometry::default(), at).unwrap();
/// // Monday 09:00 UTC is Monday 11:00 in UTC+2.
/// assert_eq!(translated.get("day_0_slot_11"), Some(&true));
/// assert_eq!(translated.len(), 1);
/// ```
pub fn translate_grid(
    grid: &AvailabilityGrid,
    from_tz: &str,
    to_tz: &str,
    geometry: &WeekGeometry,
    at: DateTime<Utc>,
) -> Result<AvailabilityGrid> {
    geometry.validate()?;
    let offset = offset_minutes(from_tz, to_tz, at)?;
    let slot_shift = round_half_away(offset, geometry.slot_interval_minutes as i32);
    debug!("translating {from_tz} -> {to_tz}: {offset} minutes, {slot_shift} slots");

    let mut translated = AvailabilityGrid::new();
    for (key, &available) in grid {
        if !available {
            continue;
        }
        let parsed = SlotKey::parse(key)?;
        let checked = SlotKey::new(i64::from(parsed.day), i64::from(parsed.slot), geometry)?;
        let moved = SlotKey::normalize(
            i64::from(checked.day),
            i64::from(checked.slot) + i64::from(slot_shift),
            geometry,
        )?;
        trace!("slot {checked} -> {moved}");
        translated.insert(moved.to_string(), true);
    }
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap()
    }

    fn geometry() -> WeekGeometry {
        WeekGeometry::default()
    }

    fn grid_of(keys: &[&str]) -> AvailabilityGrid {
        keys.iter().map(|k| (k.to_string(), true)).collect()
    }

    fn true_keys(grid: &AvailabilityGrid) -> Vec<&str> {
        grid.iter()
            .filter(|(_, &v)| v)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    #[test]
    fn test_translate_shifts_forward_within_a_day() {
        // Monday 09:00 UTC -> Monday 11:00 in UTC+2.
        let grid = grid_of(&["day_0_slot_9"]);
        let out = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_0_slot_11"]);
    }

    #[test]
    fn test_translate_wraps_backward_across_the_week_edge() {
        // Monday 01:00 UTC -> Sunday 22:00 in UTC-3.
        let grid = grid_of(&["day_0_slot_1"]);
        let out = translate_grid(&grid, "UTC", "Etc/GMT+3", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_6_slot_22"]);
    }

    #[test]
    fn test_translate_wraps_forward_across_the_week_edge() {
        // Sunday 23:00 UTC -> Monday 01:00 in UTC+2.
        let grid = grid_of(&["day_6_slot_23"]);
        let out = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_0_slot_1"]);
    }

    #[test]
    fn test_translate_emits_only_true_entries() {
        let mut grid = grid_of(&["day_2_slot_10"]);
        grid.insert("day_3_slot_5".to_string(), false);
        let out = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("day_2_slot_12"), Some(&true));
    }

    #[test]
    fn test_translate_skips_false_entries_without_inspecting_them() {
        // A junk key with a false value never reaches the parser.
        let mut grid = grid_of(&["day_1_slot_8"]);
        grid.insert("left over garbage".to_string(), false);
        let out = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_1_slot_10"]);
    }

    #[test]
    fn test_translate_accepts_legacy_keys_and_emits_canonical() {
        let grid = grid_of(&["day0_slot9"]);
        let out = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_0_slot_11"]);
    }

    #[test]
    fn test_translate_fails_on_malformed_true_key() {
        let mut grid = grid_of(&["day_0_slot_9"]);
        grid.insert("banana".to_string(), true);
        let err = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at())
            .unwrap_err()
            .to_string();
        assert!(err.contains("Malformed slot key"), "got: {err}");
    }

    #[test]
    fn test_translate_fails_on_out_of_range_true_key() {
        let grid = grid_of(&["day_7_slot_0"]);
        let err = translate_grid(&grid, "UTC", "Etc/GMT-2", &geometry(), at())
            .unwrap_err()
            .to_string();
        assert!(err.contains("out of range"), "got: {err}");
    }

    #[test]
    fn test_translate_fails_on_unresolvable_zone_before_touching_the_grid() {
        let grid = grid_of(&["day_0_slot_9"]);
        let err = translate_grid(&grid, "UTC", "Atlantis/Capital", &geometry(), at())
            .unwrap_err()
            .to_string();
        assert!(err.contains("Unresolvable timezone"), "got: {err}");
    }

    #[test]
    fn test_translate_empty_and_all_false_grids_are_empty() {
        let empty = AvailabilityGrid::new();
        let out = translate_grid(&empty, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert!(out.is_empty());

        let mut all_false = AvailabilityGrid::new();
        all_false.insert("day_0_slot_0".to_string(), false);
        all_false.insert("day_4_slot_12".to_string(), false);
        let out = translate_grid(&all_false, "UTC", "Etc/GMT-2", &geometry(), at()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_translate_same_zone_is_identity_on_true_entries() {
        let grid = grid_of(&["day_0_slot_0", "day_3_slot_12", "day_6_slot_23"]);
        let out = translate_grid(&grid, "Europe/Paris", "Europe/Paris", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), true_keys(&grid));
    }

    #[test]
    fn test_translate_uses_dst_offset_at_the_reference_instant() {
        // Johannesburg is UTC+2 year round; Sao Paulo is UTC-3 at this
        // instant. 14:00 slot in Johannesburg -> 09:00 in Sao Paulo.
        let grid = grid_of(&["day_0_slot_14"]);
        let out = translate_grid(
            &grid,
            "Africa/Johannesburg",
            "America/Sao_Paulo",
            &geometry(),
            at(),
        )
        .unwrap();
        assert_eq!(true_keys(&out), vec!["day_0_slot_9"]);
    }

    #[test]
    fn test_translate_rounds_half_hour_zones_to_nearest_slot() {
        // Kolkata is +05:30 from UTC: 330 minutes rounds to 6 slots.
        let grid = grid_of(&["day_0_slot_0"]);
        let out = translate_grid(&grid, "UTC", "Asia/Kolkata", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_0_slot_6"]);

        // And the reverse direction rounds -330 to -6, so slots return home.
        let back = translate_grid(&out, "Asia/Kolkata", "UTC", &geometry(), at()).unwrap();
        assert_eq!(true_keys(&back), vec!["day_0_slot_0"]);
    }

    #[test]
    fn test_translate_custom_geometry_half_hour_grid() {
        // On a 30-minute grid Kolkata's +05:30 is exactly 11 slots.
        let geometry = WeekGeometry {
            slot_interval_minutes: 30,
            slots_per_day: 48,
            days_per_week: 7,
        };
        let grid = grid_of(&["day_0_slot_0"]);
        let out = translate_grid(&grid, "UTC", "Asia/Kolkata", &geometry, at()).unwrap();
        assert_eq!(true_keys(&out), vec!["day_0_slot_11"]);
    }

    #[test]
    fn test_round_half_away_matches_its_name() {
        assert_eq!(round_half_away(90, 60), 2);
        assert_eq!(round_half_away(-90, 60), -2);
        assert_eq!(round_half_away(30, 60), 1);
        assert_eq!(round_half_away(-30, 60), -1);
        assert_eq!(round_half_away(29, 60), 0);
        assert_eq!(round_half_away(-29, 60), 0);
        assert_eq!(round_half_away(120, 60), 2);
        assert_eq!(round_half_away(0, 60), 0);
    }
}
