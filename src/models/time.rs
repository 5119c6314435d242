//! Minute-of-day ranges and shift windows.
//!
//! # Time Model
//! Times are minutes relative to midnight of the shift's calendar day.
//! A range may end past 1440 to represent an overnight shift; a shift
//! ending on the third following day ends at most at `4 * 1440`.
//!
//! # Overlap
//! Ranges are half-open `[start, end)`. Two ranges overlap iff each starts
//! strictly before the other ends, so touching endpoints never conflict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i32 = 1440;

/// Largest day offset a shift end may carry.
pub const MAX_END_DAY_OFFSET: u8 = 3;

/// A time interval [start, end) in minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeRange {
    /// Interval start (minutes, inclusive).
    pub start: i32,
    /// Interval end (minutes, exclusive).
    pub end: i32,
}

impl TimeRange {
    /// Creates a new range.
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// The whole calendar day, 00:00 to 24:00.
    pub fn full_day() -> Self {
        Self::new(0, MINUTES_PER_DAY)
    }

    /// Duration (minutes). Zero for empty or inverted ranges.
    #[inline]
    pub fn duration(&self) -> i32 {
        (self.end - self.start).max(0)
    }

    /// Whether the range covers no time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a minute falls within this range.
    #[inline]
    pub fn contains(&self, minute: i32) -> bool {
        minute >= self.start && minute < self.end
    }

    /// Whether two ranges overlap. Touching ranges do not.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Moves the range by whole days.
    ///
    /// Returns `None` if the shifted range does not fit in `i32` minutes.
    pub fn shifted_days(&self, days: i64) -> Option<Self> {
        let delta = days.checked_mul(i64::from(MINUTES_PER_DAY))?;
        let delta = i32::try_from(delta).ok()?;
        Some(Self::new(
            self.start.checked_add(delta)?,
            self.end.checked_add(delta)?,
        ))
    }

    /// Intersection with `other`, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then(|| Self::new(start, end))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_clock(f, self.start)?;
        f.write_str("-")?;
        write_clock(f, self.end)
    }
}

/// Writes `HH:MM`, with a `+N` day suffix past midnight.
fn write_clock(f: &mut fmt::Formatter<'_>, minutes: i32) -> fmt::Result {
    let days = minutes.div_euclid(MINUTES_PER_DAY);
    let rem = minutes.rem_euclid(MINUTES_PER_DAY);
    // 24:00 reads better than 00:00+1 for an end-of-day boundary.
    if days == 1 && rem == 0 {
        return f.write_str("24:00");
    }
    write!(f, "{:02}:{:02}", rem / 60, rem % 60)?;
    if days != 0 {
        write!(f, "{days:+}")?;
    }
    Ok(())
}

/// A shift time as entered for a row.
///
/// Start and end are kept as the raw `HH:MM` strings so that malformed
/// input survives round-trips; [`ShiftWindow::interval`] is the only
/// place they are interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWindow {
    /// Start clock time (`HH:MM`).
    pub start: String,
    /// End clock time (`HH:MM`).
    pub end: String,
    /// Days after the start day on which the shift ends (0..=3).
    #[serde(default)]
    pub end_day_offset: u8,
}

impl ShiftWindow {
    /// Creates a same-day shift window.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            end_day_offset: 0,
        }
    }

    /// Sets the end day offset.
    pub fn with_end_day_offset(mut self, offset: u8) -> Self {
        self.end_day_offset = offset;
        self
    }

    /// Effective interval of the shift.
    ///
    /// Returns `None` if either clock time fails to parse, the day offset
    /// exceeds [`MAX_END_DAY_OFFSET`], or the end is not after the start.
    pub fn interval(&self) -> Option<TimeRange> {
        if self.end_day_offset > MAX_END_DAY_OFFSET {
            return None;
        }
        let start = parse_clock(&self.start)?;
        let end = parse_clock(&self.end)? + i32::from(self.end_day_offset) * MINUTES_PER_DAY;
        (end > start).then(|| TimeRange::new(start, end))
    }
}

/// Parses `H:MM` / `HH:MM` into minutes after midnight.
///
/// `24:00` is accepted as the end-of-day boundary.
pub fn parse_clock(s: &str) -> Option<i32> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if !(0..60).contains(&minutes) {
        return None;
    }
    match hours {
        0..=23 => Some(hours * 60 + minutes),
        24 if minutes == 0 => Some(MINUTES_PER_DAY),
        _ => None,
    }
}

/// Merges ranges into a sorted set of disjoint ranges.
///
/// Overlapping and touching ranges are coalesced; empty ranges are dropped.
pub fn merge_ranges(ranges: impl IntoIterator<Item = TimeRange>) -> Vec<TimeRange> {
    let mut sorted: Vec<TimeRange> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
    sorted.sort();

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for r in sorted {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    merged
}

/// Returns the parts of `window` not covered by any of `busy`.
pub fn subtract_ranges(
    window: TimeRange,
    busy: impl IntoIterator<Item = TimeRange>,
) -> Vec<TimeRange> {
    if window.is_empty() {
        return Vec::new();
    }
    let clipped = busy.into_iter().filter_map(|b| b.intersect(&window));

    let mut free = Vec::new();
    let mut cursor = window.start;
    for b in merge_ranges(clipped) {
        if b.start > cursor {
            free.push(TimeRange::new(cursor, b.start));
        }
        cursor = cursor.max(b.end);
    }
    if cursor < window.end {
        free.push(TimeRange::new(cursor, window.end));
    }
    free
}
