//! Forced rest days around on-call shifts.
//!
//! # Rule
//! On-call assignments of a clinician on consecutive dates form a run
//! `F ..= L`. The clinician rests on `F - days_before ..= F - 1` and
//! `L + 1 ..= L + days_after`. Back-to-back on-call days therefore force
//! no rest between them, while an on-call shift that does not continue a
//! run still lands on a rest day if it falls inside another run's window.
//!
//! Windows are capped at [`MAX_REST_WINDOW_DAYS`] on either side.

use chrono::{Days, NaiveDate};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{Assignment, OnCallRestRule, Row, MAX_REST_WINDOW_DAYS};

/// Rest days per clinician.
#[derive(Debug, Clone, Default)]
pub struct RestDays {
    by_clinician: HashMap<String, BTreeSet<NaiveDate>>,
}

impl RestDays {
    /// Whether `clinician_id` must rest on `date`.
    pub fn contains(&self, clinician_id: &str, date: NaiveDate) -> bool {
        self.by_clinician
            .get(clinician_id)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Rest dates of a clinician, ascending.
    pub fn dates_for(&self, clinician_id: &str) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_clinician
            .get(clinician_id)
            .into_iter()
            .flat_map(|dates| dates.iter().copied())
    }

    /// Total number of (clinician, date) rest entries.
    pub fn len(&self) -> usize {
        self.by_clinician.values().map(BTreeSet::len).sum()
    }

    /// Whether no rest days were inferred.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Infers forced rest days from on-call assignments.
///
/// Returns an empty set when the rule is disabled or has no class.
pub fn infer_rest_days<'a>(
    assignments: impl IntoIterator<Item = &'a Assignment>,
    rows: &[Row],
    rule: &OnCallRestRule,
) -> RestDays {
    let Some(class_id) = rule.active_class() else {
        return RestDays::default();
    };

    let on_call_rows: HashSet<&str> = rows
        .iter()
        .filter(|r| !r.is_pool() && r.is_class(class_id))
        .map(|r| r.id.as_str())
        .collect();

    let mut on_call: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
    for a in assignments {
        if on_call_rows.contains(a.row_id.as_str()) {
            on_call.entry(a.clinician_id.as_str()).or_default().insert(a.date);
        }
    }

    let before = u64::from(rule.days_before.min(MAX_REST_WINDOW_DAYS));
    let after = u64::from(rule.days_after.min(MAX_REST_WINDOW_DAYS));

    let mut by_clinician = HashMap::new();
    for (clinician_id, duty_dates) in on_call {
        let mut rest = BTreeSet::new();
        for (first, last) in consecutive_runs(&duty_dates) {
            for k in 1..=before {
                rest.extend(first.checked_sub_days(Days::new(k)));
            }
            for k in 1..=after {
                rest.extend(last.checked_add_days(Days::new(k)));
            }
        }
        if !rest.is_empty() {
            by_clinician.insert(clinician_id.to_string(), rest);
        }
    }

    RestDays { by_clinician }
}

/// First and last date of each run of consecutive dates.
fn consecutive_runs(dates: &BTreeSet<NaiveDate>) -> Vec<(NaiveDate, NaiveDate)> {
    let mut runs: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for &date in dates {
        match runs.last_mut() {
            Some((_, last)) if last.succ_opt() == Some(date) => *last = date,
            _ => runs.push((date, date)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftWindow;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::class("oc", "on-call")
                .with_shift(ShiftWindow::new("17:00", "08:00").with_end_day_offset(1)),
            Row::class("mri-am", "mri"),
        ]
    }

    #[test]
    fn test_rest_after_on_call() {
        let assignments = vec![Assignment::new("a1", "oc", d(10), "c1")];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 0, 1));

        assert!(rest.contains("c1", d(11)));
        assert!(!rest.contains("c1", d(10)));
        assert!(!rest.contains("c1", d(9)));
        assert!(!rest.contains("c1", d(12)));
        assert!(!rest.contains("c2", d(11)));
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_rest_before_and_after() {
        let assignments = vec![Assignment::new("a1", "oc", d(10), "c1")];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 2, 1));

        let dates: Vec<_> = rest.dates_for("c1").collect();
        assert_eq!(dates, vec![d(8), d(9), d(11)]);
    }

    #[test]
    fn test_consecutive_on_call_is_not_rest() {
        let assignments = vec![
            Assignment::new("a1", "oc", d(10), "c1"),
            Assignment::new("a2", "oc", d(11), "c1"),
        ];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 1, 1));

        let dates: Vec<_> = rest.dates_for("c1").collect();
        assert_eq!(dates, vec![d(9), d(12)]);
    }

    #[test]
    fn test_on_call_inside_another_run_window_is_rest() {
        // d12 does not continue d10's run, so d10's two-day window still covers it
        let assignments = vec![
            Assignment::new("a1", "oc", d(10), "c1"),
            Assignment::new("a2", "oc", d(12), "c1"),
        ];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 0, 2));

        let dates: Vec<_> = rest.dates_for("c1").collect();
        assert_eq!(dates, vec![d(11), d(12), d(13), d(14)]);
    }

    #[test]
    fn test_long_run_rests_after_last_day() {
        let assignments = vec![
            Assignment::new("a1", "oc", d(10), "c1"),
            Assignment::new("a2", "oc", d(11), "c1"),
            Assignment::new("a3", "oc", d(12), "c1"),
        ];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 0, 2));

        let dates: Vec<_> = rest.dates_for("c1").collect();
        assert_eq!(dates, vec![d(13), d(14)]);
    }

    #[test]
    fn test_window_capped() {
        let assignments = vec![Assignment::new("a1", "oc", d(10), "c1")];
        let rule = OnCallRestRule::new("on-call", 0, 200_000_000);
        let rest = infer_rest_days(&assignments, &rows(), &rule);
        assert_eq!(rest.len(), MAX_REST_WINDOW_DAYS as usize);
    }

    #[test]
    fn test_non_on_call_rows_ignored() {
        let assignments = vec![Assignment::new("a1", "mri-am", d(10), "c1")];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 1, 1));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_disabled_rule() {
        let assignments = vec![Assignment::new("a1", "oc", d(10), "c1")];
        let mut rule = OnCallRestRule::new("on-call", 1, 1);
        rule.enabled = false;
        assert!(infer_rest_days(&assignments, &rows(), &rule).is_empty());
        assert!(infer_rest_days(&assignments, &rows(), &OnCallRestRule::default()).is_empty());
    }

    #[test]
    fn test_rest_crosses_month_boundary() {
        let assignments = vec![Assignment::new("a1", "oc", d(31), "c1")];
        let rest = infer_rest_days(&assignments, &rows(), &OnCallRestRule::new("on-call", 0, 1));
        assert!(rest.contains("c1", NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }
}
