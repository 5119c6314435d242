//! Rota rows.
//!
//! A row is one line of the rota grid. Concrete rows are shift slots of a
//! class (a section such as "MRI" or "on-call"); pool rows are synthetic
//! buckets that collect clinicians without a concrete assignment.

use serde::{Deserialize, Serialize};

use super::time::{ShiftWindow, TimeRange};

/// Well-known id of the unassigned pool row.
pub const POOL_UNASSIGNED_ID: &str = "pool-unassigned";
/// Well-known id of the vacation pool row.
pub const POOL_VACATION_ID: &str = "pool-vacation";
/// Well-known id of the rest-day pool row.
pub const POOL_REST_DAY_ID: &str = "pool-rest-day";

/// Synthetic pool buckets, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoolKind {
    /// No concrete assignment on the day.
    Unassigned,
    /// On vacation; overrides every other placement.
    Vacation,
    /// Forced rest day derived from an on-call rule.
    RestDay,
}

impl PoolKind {
    /// Well-known row id of this pool.
    pub fn row_id(self) -> &'static str {
        match self {
            PoolKind::Unassigned => POOL_UNASSIGNED_ID,
            PoolKind::Vacation => POOL_VACATION_ID,
            PoolKind::RestDay => POOL_REST_DAY_ID,
        }
    }

    /// Pool for a well-known row id.
    pub fn from_row_id(row_id: &str) -> Option<Self> {
        match row_id {
            POOL_UNASSIGNED_ID => Some(PoolKind::Unassigned),
            POOL_VACATION_ID => Some(PoolKind::Vacation),
            POOL_REST_DAY_ID => Some(PoolKind::RestDay),
            _ => None,
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            PoolKind::Unassigned => "Unassigned",
            PoolKind::Vacation => "Vacation",
            PoolKind::RestDay => "Rest day",
        }
    }
}

/// Row classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    /// A concrete shift slot.
    Class,
    /// A synthetic pool bucket.
    Pool(PoolKind),
}

/// A rota row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Unique row identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Concrete slot or pool.
    pub kind: RowKind,
    /// Class (section) the slot belongs to. `None` for pools.
    #[serde(default)]
    pub class_id: Option<String>,
    /// Physical location, used by the same-location-per-day rule.
    #[serde(default)]
    pub location: Option<String>,
    /// Shift time of the slot.
    #[serde(default)]
    pub shift: Option<ShiftWindow>,
}

impl Row {
    /// Creates a concrete shift row of `class_id`.
    pub fn class(id: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: RowKind::Class,
            class_id: Some(class_id.into()),
            location: None,
            shift: None,
        }
    }

    /// Creates the pool row for `kind`.
    pub fn pool(kind: PoolKind) -> Self {
        Self {
            id: kind.row_id().to_string(),
            name: kind.display_name().to_string(),
            kind: RowKind::Pool(kind),
            class_id: None,
            location: None,
            shift: None,
        }
    }

    /// The three pool rows in display order.
    pub fn pools() -> Vec<Row> {
        [PoolKind::Unassigned, PoolKind::RestDay, PoolKind::Vacation]
            .into_iter()
            .map(Row::pool)
            .collect()
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the shift time.
    pub fn with_shift(mut self, shift: ShiftWindow) -> Self {
        self.shift = Some(shift);
        self
    }

    /// Whether this row is a pool bucket.
    #[inline]
    pub fn is_pool(&self) -> bool {
        matches!(self.kind, RowKind::Pool(_))
    }

    /// Pool kind, if this row is a pool.
    pub fn pool_kind(&self) -> Option<PoolKind> {
        match self.kind {
            RowKind::Pool(kind) => Some(kind),
            RowKind::Class => None,
        }
    }

    /// Effective shift interval.
    ///
    /// `None` for pools, rows without a shift, and malformed shifts.
    pub fn interval(&self) -> Option<TimeRange> {
        if self.is_pool() {
            return None;
        }
        self.shift.as_ref().and_then(ShiftWindow::interval)
    }

    /// Whether this row belongs to `class_id`.
    pub fn is_class(&self, class_id: &str) -> bool {
        self.class_id.as_deref() == Some(class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_row_builder() {
        let r = Row::class("mri-am", "mri")
            .with_name("MRI morning")
            .with_location("Building A")
            .with_shift(ShiftWindow::new("08:00", "12:00"));

        assert_eq!(r.id, "mri-am");
        assert_eq!(r.kind, RowKind::Class);
        assert!(r.is_class("mri"));
        assert!(!r.is_pool());
        assert_eq!(r.location.as_deref(), Some("Building A"));
        assert_eq!(r.interval(), Some(TimeRange::new(480, 720)));
    }

    #[test]
    fn test_pool_rows() {
        let pools = Row::pools();
        assert_eq!(pools.len(), 3);
        assert!(pools.iter().all(Row::is_pool));
        assert_eq!(pools[0].id, POOL_UNASSIGNED_ID);
        assert_eq!(pools[1].pool_kind(), Some(PoolKind::RestDay));
        assert_eq!(pools[2].id, POOL_VACATION_ID);
    }

    #[test]
    fn test_pool_kind_row_ids() {
        for kind in [PoolKind::Unassigned, PoolKind::Vacation, PoolKind::RestDay] {
            assert_eq!(PoolKind::from_row_id(kind.row_id()), Some(kind));
        }
        assert_eq!(PoolKind::from_row_id("mri-am"), None);
    }

    #[test]
    fn test_pool_has_no_interval() {
        let mut p = Row::pool(PoolKind::Unassigned);
        p.shift = Some(ShiftWindow::new("08:00", "16:00"));
        assert_eq!(p.interval(), None);
    }

    #[test]
    fn test_malformed_shift_has_no_interval() {
        let r = Row::class("x", "ct").with_shift(ShiftWindow::new("16:00", "08:00"));
        assert_eq!(r.interval(), None);
        assert_eq!(Row::class("y", "ct").interval(), None);
    }

    #[test]
    fn test_row_kind_serde() {
        let r: Row = serde_json::from_str(
            r#"{"id":"pool-vacation","name":"Vacation","kind":{"pool":"vacation"}}"#,
        )
        .unwrap();
        assert_eq!(r.pool_kind(), Some(PoolKind::Vacation));

        let r: Row = serde_json::from_str(
            r#"{"id":"oc","name":"On call","kind":"class","classId":"on-call",
                "shift":{"start":"17:00","end":"08:00","endDayOffset":1}}"#,
        )
        .unwrap();
        assert!(r.is_class("on-call"));
        assert_eq!(r.interval(), Some(TimeRange::new(1020, 1920)));
    }
}
