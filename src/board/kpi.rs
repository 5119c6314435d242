//! Board summary metrics.
//!
//! Condenses a derived [`BoardView`] into per-day head counts for status
//! bars and print headers.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Assigned | Distinct clinicians placed in concrete rows |
//! | Pool sizes | Members of the unassigned, vacation, rest-day pools |
//! | Uncovered rows | Concrete rows with nobody placed |
//! | Coverage | Covered rows / concrete rows |

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use super::derive::{BoardView, DayView};

/// Head counts of one date.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// Column date.
    pub date: NaiveDate,
    /// Distinct clinicians in concrete rows.
    pub assigned: usize,
    /// Unassigned pool size.
    pub unassigned: usize,
    /// Vacation pool size.
    pub on_vacation: usize,
    /// Rest-day pool size.
    pub on_rest_day: usize,
    /// Concrete rows with nobody placed, in row id order.
    pub uncovered_rows: Vec<String>,
    /// Fraction of concrete rows with at least one clinician (0.0..1.0).
    pub coverage: f64,
}

/// Summary of a whole board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    /// Per-day counts, in date order.
    pub days: Vec<DaySummary>,
    /// Number of board warnings.
    pub warning_count: usize,
}

impl DaySummary {
    /// Computes the counts of one day.
    pub fn calculate(day: &DayView) -> Self {
        let assigned: BTreeSet<&str> = day
            .cells
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        let uncovered_rows: Vec<String> = day
            .cells
            .iter()
            .filter(|(_, members)| members.is_empty())
            .map(|(row, _)| row.clone())
            .collect();

        let coverage = if day.cells.is_empty() {
            1.0
        } else {
            (day.cells.len() - uncovered_rows.len()) as f64 / day.cells.len() as f64
        };

        Self {
            date: day.date,
            assigned: assigned.len(),
            unassigned: day.pools.unassigned.len(),
            on_vacation: day.pools.vacation.len(),
            on_rest_day: day.pools.rest_day.len(),
            uncovered_rows,
            coverage,
        }
    }
}

impl BoardSummary {
    /// Computes the summary of a board.
    pub fn calculate(view: &BoardView) -> Self {
        Self {
            days: view.days.iter().map(DaySummary::calculate).collect(),
            warning_count: view.warnings.len(),
        }
    }

    /// Lowest daily coverage (1.0 for an empty board).
    pub fn min_coverage(&self) -> f64 {
        self.days
            .iter()
            .map(|d| d.coverage)
            .fold(1.0, f64::min)
    }

    /// Whether every day reaches `min_coverage` and no warnings exist.
    pub fn meets_thresholds(&self, min_coverage: f64) -> bool {
        self.warning_count == 0 && self.min_coverage() >= min_coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{derive_board, BoardRequest};
    use crate::models::{Assignment, Clinician, Row, ShiftWindow};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn sample_view(assignments: Vec<Assignment>) -> BoardView {
        let mut rows = vec![
            Row::class("mri-am", "mri").with_shift(ShiftWindow::new("08:00", "12:00")),
            Row::class("mri-pm", "mri").with_shift(ShiftWindow::new("13:00", "17:00")),
            Row::class("ct-am", "ct").with_shift(ShiftWindow::new("08:00", "12:00")),
            Row::class("ct-pm", "ct").with_shift(ShiftWindow::new("13:00", "17:00")),
        ];
        rows.extend(Row::pools());
        let req = BoardRequest::new(d(3), 2)
            .with_rows(rows)
            .with_clinicians(vec![
                Clinician::new("c1"),
                Clinician::new("c2"),
                Clinician::new("c3").with_vacation(d(3), d(3)),
            ])
            .with_roster(assignments);
        derive_board(&req).unwrap()
    }

    #[test]
    fn test_day_counts() {
        let view = sample_view(vec![
            Assignment::new("a1", "mri-am", d(3), "c1"),
            Assignment::new("a2", "mri-pm", d(3), "c1"),
            Assignment::new("a3", "ct-am", d(3), "c2"),
        ]);
        let summary = BoardSummary::calculate(&view);

        let day3 = &summary.days[0];
        assert_eq!(day3.assigned, 2); // c1 counted once
        assert_eq!(day3.unassigned, 0);
        assert_eq!(day3.on_vacation, 1);
        assert_eq!(day3.on_rest_day, 0);
        assert_eq!(day3.uncovered_rows, vec!["ct-pm".to_string()]);
        assert!((day3.coverage - 0.75).abs() < 1e-10);

        let day4 = &summary.days[1];
        assert_eq!(day4.assigned, 0);
        assert_eq!(day4.unassigned, 3);
        assert!((day4.coverage - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_thresholds() {
        let view = sample_view(vec![
            Assignment::new("a1", "mri-am", d(3), "c1"),
            Assignment::new("a2", "mri-pm", d(4), "c2"),
        ]);
        let summary = BoardSummary::calculate(&view);
        assert!((summary.min_coverage() - 0.25).abs() < 1e-10);
        assert!(summary.meets_thresholds(0.25));
        assert!(!summary.meets_thresholds(0.5));
    }

    #[test]
    fn test_warnings_fail_thresholds() {
        let view = sample_view(vec![Assignment::new("a1", "mri-am", d(3), "c3")]);
        let summary = BoardSummary::calculate(&view);
        assert_eq!(summary.warning_count, 1);
        assert!(!summary.meets_thresholds(0.0));
    }

    #[test]
    fn test_no_concrete_rows() {
        let req = BoardRequest::new(d(3), 1)
            .with_rows(Row::pools())
            .with_clinicians(vec![Clinician::new("c1")]);
        let summary = BoardSummary::calculate(&derive_board(&req).unwrap());
        assert!((summary.days[0].coverage - 1.0).abs() < 1e-10);
        assert_eq!(summary.days[0].unassigned, 1);
    }
}
