//! Week geometry, slot keys, and availability grids.
//!
//! A scheduling week is a discrete grid: `days_per_week` days of
//! `slots_per_day` slots, each `slot_interval_minutes` long. Positions in
//! the grid are [`SlotKey`] values (day 0 = Monday), rendered canonically
//! as `day_<day>_slot_<slot>`. Availability is a sparse map from canonical
//! key to a boolean; absent and `false` both mean unavailable.
//!
//! This module is the only place key strings are parsed or rendered.
//! Everything else in the crate passes structured [`SlotKey`] pairs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

// ── WeekGeometry ────────────────────────────────────────────────────────────

/// Discrete layout of a scheduling week.
///
/// Passed explicitly to every codec and translation operation so the same
/// engine serves hour grids, half-hour grids, or shortened pilot weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekGeometry {
    /// Minutes covered by one slot.
    pub slot_interval_minutes: u32,
    /// Slots in one day.
    pub slots_per_day: u32,
    /// Days in one week (day 0 = Monday).
    pub days_per_week: u32,
}

impl Default for WeekGeometry {
    /// The standard grid: 60-minute slots, 24 per day, 7 days.
    fn default() -> Self {
        Self {
            slot_interval_minutes: 60,
            slots_per_day: 24,
            days_per_week: 7,
        }
    }
}

impl WeekGeometry {
    /// Reject degenerate geometry before it reaches any modulo arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidGeometry`] if any dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if self.slot_interval_minutes == 0 {
            return Err(ScheduleError::InvalidGeometry(
                "slotIntervalMinutes must be nonzero".to_string(),
            ));
        }
        if self.slots_per_day == 0 {
            return Err(ScheduleError::InvalidGeometry(
                "slotsPerDay must be nonzero".to_string(),
            ));
        }
        if self.days_per_week == 0 {
            return Err(ScheduleError::InvalidGeometry(
                "daysPerWeek must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

// ── SlotKey ─────────────────────────────────────────────────────────────────

/// A position in the weekly grid: `(day, slot)` with day 0 = Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotKey {
    pub day: u32,
    pub slot: u32,
}

impl SlotKey {
    /// Range-checked constructor: the encode side of the codec.
    ///
    /// Callers building keys from layout or user input go through here.
    /// Out-of-range indices are an error, never silently wrapped —
    /// wrapping is reserved for [`SlotKey::normalize`], where the caller
    /// has explicitly asked for it.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::IndexOutOfRange`] if `day` is not in
    /// `[0, days_per_week)` or `slot` is not in `[0, slots_per_day)`,
    /// or [`ScheduleError::InvalidGeometry`] for degenerate geometry.
    ///
    /// # Examples
    ///
    /// ```
    /// use quorum_engine::grid::{SlotKey, WeekGeometry};
    ///
    /// let geometry = WeekGeometry::default();
    /// let key = SlotKey::new(0, 9, &geometry).unwrap();
    /// assert_eq!(key.to_string(), "day_0_slot_9");
    /// assert!(SlotKey::new(7, 0, &geometry).is_err());
    /// ```
    pub fn new(day: i64, slot: i64, geometry: &WeekGeometry) -> Result<Self> {
        geometry.validate()?;
        let in_range = (0..i64::from(geometry.days_per_week)).contains(&day)
            && (0..i64::from(geometry.slots_per_day)).contains(&slot);
        if !in_range {
            return Err(ScheduleError::IndexOutOfRange {
                day,
                slot,
                days_per_week: geometry.days_per_week,
                slots_per_day: geometry.slots_per_day,
            });
        }
        Ok(Self {
            day: day as u32,
            slot: slot as u32,
        })
    }

    /// Strict parse: the decode side of the codec.
    ///
    /// Accepts exactly two shapes:
    ///
    /// - canonical `day_<day>_slot_<slot>` (e.g. `day_0_slot_9`)
    /// - legacy `day<day>_slot<slot>` (e.g. `day0_slot9`), written by an
    ///   earlier client release and still present in stored grids
    ///
    /// Parsing is purely syntactic — no geometry is consulted, so a key
    /// like `day_9_slot_99` decodes fine and only fails a later range
    /// check. Anything not matching the two shapes is an error; junk keys
    /// never pass through a translation unexamined.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::MalformedKey`] for any other shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use quorum_engine::grid::SlotKey;
    ///
    /// assert_eq!(SlotKey::parse("day_4_slot_15").unwrap(), SlotKey { day: 4, slot: 15 });
    /// assert_eq!(SlotKey::parse("day4_slot15").unwrap(), SlotKey { day: 4, slot: 15 });
    /// assert!(SlotKey::parse("friday_slot_2").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix("day_") {
            // Canonical: day_<day>_slot_<slot>
            if let Some((day, slot)) = rest.split_once("_slot_") {
                if let (Some(day), Some(slot)) = (parse_index(day), parse_index(slot)) {
                    return Ok(Self { day, slot });
                }
            }
        } else if let Some(rest) = s.strip_prefix("day") {
            // Legacy: day<day>_slot<slot>
            if let Some((day, slot)) = rest.split_once("_slot") {
                if let (Some(day), Some(slot)) = (parse_index(day), parse_index(slot)) {
                    return Ok(Self { day, slot });
                }
            }
        }
        Err(ScheduleError::MalformedKey(format!("'{}'", s)))
    }

    /// Wrap arbitrary indices into the grid.
    ///
    /// One rule covers every direction: `slot` is wrapped into
    /// `[0, slots_per_day)` with the overflow or underflow carried into
    /// `day`, then `day` is wrapped modulo `days_per_week`. Both steps use
    /// Euclidean remainders, so results are non-negative for any `i64`
    /// input — a slot shifted past Sunday lands on Monday, and a slot
    /// shifted before Monday lands on Sunday.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidGeometry`] for degenerate geometry.
    ///
    /// # Examples
    ///
    /// ```
    /// use quorum_engine::grid::{SlotKey, WeekGeometry};
    ///
    /// let geometry = WeekGeometry::default();
    /// // Monday 01:00 shifted back three hours is Sunday 22:00.
    /// let key = SlotKey::normalize(0, -2, &geometry).unwrap();
    /// assert_eq!(key, SlotKey { day: 6, slot: 22 });
    /// ```
    pub fn normalize(day: i64, slot: i64, geometry: &WeekGeometry) -> Result<Self> {
        geometry.validate()?;
        let slots_per_day = i128::from(geometry.slots_per_day);
        let days_per_week = i128::from(geometry.days_per_week);

        // Carry slot overflow/underflow into the day, then wrap the day.
        // i128 keeps the carry exact at the extremes of i64.
        let carried_day = i128::from(day) + i128::from(slot).div_euclid(slots_per_day);
        let slot = i128::from(slot).rem_euclid(slots_per_day);
        let day = carried_day.rem_euclid(days_per_week);

        Ok(Self {
            day: day as u32,
            slot: slot as u32,
        })
    }
}

/// Digits-only index parse. Rejects signs, whitespace, and empty strings.
fn parse_index(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for SlotKey {
    /// Renders the canonical form, `day_<day>_slot_<slot>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day_{}_slot_{}", self.day, self.slot)
    }
}

impl FromStr for SlotKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlotKey {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> String {
        key.to_string()
    }
}

// ── AvailabilityGrid ────────────────────────────────────────────────────────

/// Sparse weekly availability: canonical slot key → available.
///
/// Absent keys and `false` entries mean the same thing. A `BTreeMap` keeps
/// serialized grids in a stable order.
pub type AvailabilityGrid = BTreeMap<String, bool>;

/// Build the all-false default grid a new member starts with.
///
/// Every key of the geometry is materialized with value `false`, matching
/// the stored shape clients expect when a member has never edited their
/// availability.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidGeometry`] for degenerate geometry.
pub fn blank_grid(geometry: &WeekGeometry) -> Result<AvailabilityGrid> {
    geometry.validate()?;
    let mut grid = AvailabilityGrid::new();
    for day in 0..geometry.days_per_week {
        for slot in 0..geometry.slots_per_day {
            grid.insert(SlotKey { day, slot }.to_string(), false);
        }
    }
    Ok(grid)
}
