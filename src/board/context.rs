//! Board request and lookup context shared by derivation and move checks.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::models::{Assignment, Clinician, Roster, Row, SolverSettings, TimeRange};

/// Everything needed to derive one board view.
///
/// `first_day` and `days` select the dates shown; assignments outside
/// that span still feed rest-day inference and overnight spill-over.
#[derive(Debug, Clone)]
pub struct BoardRequest {
    /// Grid rows (concrete and pool).
    pub rows: Vec<Row>,
    /// Clinicians, in display order.
    pub clinicians: Vec<Clinician>,
    /// Raw assignments.
    pub roster: Roster,
    /// Legality and availability settings.
    pub settings: SolverSettings,
    /// First date of the view.
    pub first_day: NaiveDate,
    /// Number of dates in the view.
    pub days: u32,
}

impl BoardRequest {
    /// Creates an empty request spanning `days` dates from `first_day`.
    pub fn new(first_day: NaiveDate, days: u32) -> Self {
        Self {
            rows: Vec::new(),
            clinicians: Vec::new(),
            roster: Roster::new(),
            settings: SolverSettings::default(),
            first_day,
            days,
        }
    }

    /// Sets the rows.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the clinicians.
    pub fn with_clinicians(mut self, clinicians: Vec<Clinician>) -> Self {
        self.clinicians = clinicians;
        self
    }

    /// Sets the roster.
    pub fn with_roster(mut self, roster: impl Into<Roster>) -> Self {
        self.roster = roster.into();
        self
    }

    /// Sets the solver settings.
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Dates of the view, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day.iter_days().take(self.days as usize)
    }

    /// Whether `date` lies in the view span.
    pub fn in_span(&self, date: NaiveDate) -> bool {
        (0..i64::from(self.days)).contains(&days_between(self.first_day, date))
    }
}

/// An assignment resolved against its row and clinician.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placed<'a> {
    pub assignment: &'a Assignment,
    pub row: &'a Row,
    /// Position of the clinician in the request's clinician list.
    pub order: usize,
    pub interval: Option<TimeRange>,
}

impl Placed<'_> {
    /// Interval relative to midnight of `anchor`.
    ///
    /// `None` for malformed shifts and for dates too far from `anchor`
    /// to express in minutes.
    pub fn interval_from(&self, anchor: NaiveDate) -> Option<TimeRange> {
        let offset = days_between(anchor, self.assignment.date);
        self.interval.and_then(|r| r.shifted_days(offset))
    }
}

/// Id lookups over a [`BoardRequest`].
#[derive(Debug)]
pub(crate) struct BoardIndex<'a> {
    rows: HashMap<&'a str, &'a Row>,
    clinicians: HashMap<&'a str, (usize, &'a Clinician)>,
}

impl<'a> BoardIndex<'a> {
    pub fn new(request: &'a BoardRequest) -> Self {
        let rows = request.rows.iter().map(|r| (r.id.as_str(), r)).collect();
        let clinicians = request
            .clinicians
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), (i, c)))
            .collect();
        Self { rows, clinicians }
    }

    pub fn row(&self, id: &str) -> Option<&'a Row> {
        self.rows.get(id).copied()
    }

    pub fn clinician(&self, id: &str) -> Option<(usize, &'a Clinician)> {
        self.clinicians.get(id).copied()
    }

    /// Display position of a clinician; unknown ids sort last.
    pub fn order(&self, id: &str) -> usize {
        self.clinicians.get(id).map_or(usize::MAX, |(i, _)| *i)
    }

    /// Resolves the concrete assignments of a roster.
    ///
    /// Assignments to pool rows and assignments with dangling row or
    /// clinician references are dropped.
    pub fn resolve(&self, assignments: impl IntoIterator<Item = &'a Assignment>) -> Vec<Placed<'a>> {
        let mut placed = Vec::new();
        for a in assignments {
            let Some(row) = self.row(&a.row_id) else {
                debug!(assignment = %a.id, row = %a.row_id, "skipping assignment for unknown row");
                continue;
            };
            if row.is_pool() {
                trace!(assignment = %a.id, row = %a.row_id, "ignoring raw pool assignment");
                continue;
            }
            let Some((order, _)) = self.clinician(&a.clinician_id) else {
                debug!(
                    assignment = %a.id,
                    clinician = %a.clinician_id,
                    "skipping assignment for unknown clinician"
                );
                continue;
            };
            let interval = row.interval();
            if interval.is_none() && row.shift.is_some() {
                debug!(row = %row.id, "malformed shift time, excluded from conflict checks");
            }
            placed.push(Placed {
                assignment: a,
                row,
                order,
                interval,
            });
        }
        placed
    }
}

/// Signed number of days from `from` to `to`.
pub(crate) fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PoolKind, ShiftWindow};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn sample_request() -> BoardRequest {
        BoardRequest::new(d(3), 5)
            .with_rows(vec![
                Row::class("mri-am", "mri").with_shift(ShiftWindow::new("08:00", "12:00")),
                Row::class("broken", "mri").with_shift(ShiftWindow::new("12:00", "08:00")),
                Row::pool(PoolKind::Unassigned),
            ])
            .with_clinicians(vec![Clinician::new("c1"), Clinician::new("c2")])
            .with_roster(vec![
                Assignment::new("a1", "mri-am", d(3), "c2"),
                Assignment::new("a2", "pool-unassigned", d(3), "c1"),
                Assignment::new("a3", "nowhere", d(3), "c1"),
                Assignment::new("a4", "mri-am", d(3), "ghost"),
                Assignment::new("a5", "broken", d(4), "c1"),
            ])
    }

    #[test]
    fn test_dates_and_span() {
        let req = sample_request();
        let dates: Vec<_> = req.dates().collect();
        assert_eq!(dates, vec![d(3), d(4), d(5), d(6), d(7)]);
        assert!(req.in_span(d(3)));
        assert!(req.in_span(d(7)));
        assert!(!req.in_span(d(2)));
        assert!(!req.in_span(d(8)));
    }

    #[test]
    fn test_resolve_drops_pool_and_dangling() {
        let req = sample_request();
        let index = BoardIndex::new(&req);
        let placed = index.resolve(&req.roster.assignments);
        let ids: Vec<_> = placed.iter().map(|p| p.assignment.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a5"]);

        assert_eq!(placed[0].order, 1);
        assert_eq!(placed[0].interval, Some(TimeRange::new(480, 720)));
        assert_eq!(placed[1].interval, None); // malformed shift kept, no interval
    }

    #[test]
    fn test_interval_from_anchor() {
        let req = sample_request();
        let index = BoardIndex::new(&req);
        let placed = index.resolve(&req.roster.assignments);
        assert_eq!(
            placed[0].interval_from(d(4)),
            Some(TimeRange::new(480 - 1440, 720 - 1440))
        );
        assert_eq!(placed[0].interval_from(d(2)), Some(TimeRange::new(480 + 1440, 720 + 1440)));

        let far = NaiveDate::from_ymd_opt(20250, 3, 3).unwrap();
        assert_eq!(placed[0].interval_from(far), None);
    }

    #[test]
    fn test_order_unknown_sorts_last() {
        let req = sample_request();
        let index = BoardIndex::new(&req);
        assert_eq!(index.order("c1"), 0);
        assert_eq!(index.order("c2"), 1);
        assert_eq!(index.order("ghost"), usize::MAX);
    }
}
