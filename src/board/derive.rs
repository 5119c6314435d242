//! Board derivation.
//!
//! # Algorithm
//!
//! 1. Resolve raw assignments against rows and clinicians; drop pool rows
//!    and dangling references.
//! 2. Group the remaining assignments by date and row.
//! 3. Remove clinicians on vacation from their cells.
//! 4. Infer forced rest days from the on-call rule.
//! 5. Place every clinician without a concrete assignment into a pool,
//!    with priority vacation > rest day > unassigned.
//! 6. Compute free time as the day window minus the merged busy
//!    intervals, including overnight spill-over from earlier days.
//!
//! # Complexity
//! O(d * (c + a)) where d=days, c=clinicians, a=assignments.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use super::context::{days_between, BoardIndex, BoardRequest, Placed};
use super::rest_days::{infer_rest_days, RestDays};
use crate::error::{RotaError, RotaResult};
use crate::models::time::{subtract_ranges, MAX_END_DAY_OFFSET};
use crate::models::{PoolKind, TimeRange};

/// Derived board for a span of dates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    /// One entry per date, in order.
    pub days: Vec<DayView>,
    /// Data problems found while deriving, by date then clinician order.
    pub warnings: Vec<BoardWarning>,
}

/// Derived contents of one date column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    /// Column date.
    pub date: NaiveDate,
    /// Clinicians per concrete row, in clinician order. Every concrete
    /// row has an entry, possibly empty.
    pub cells: BTreeMap<String, Vec<String>>,
    /// Clinicians without a concrete assignment.
    pub pools: PoolBuckets,
    /// Free segments within the day window, per available clinician.
    pub free_time: BTreeMap<String, Vec<TimeRange>>,
}

/// Pool membership of one date.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoolBuckets {
    /// No concrete assignment.
    pub unassigned: Vec<String>,
    /// On vacation.
    pub vacation: Vec<String>,
    /// Forced rest day.
    pub rest_day: Vec<String>,
}

/// A data problem surfaced by derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "type")]
pub enum BoardWarning {
    /// An assignment falls on a vacation day and was hidden from its cell.
    AssignedOnVacation {
        date: NaiveDate,
        clinician_id: String,
        assignment_id: String,
    },
    /// An assignment falls on a forced rest day.
    AssignedOnRestDay {
        date: NaiveDate,
        clinician_id: String,
        assignment_id: String,
    },
    /// Two assignments of one clinician overlap in time.
    DoubleBooked {
        date: NaiveDate,
        clinician_id: String,
        first_assignment_id: String,
        second_assignment_id: String,
    },
}

impl BoardWarning {
    /// Date the warning is reported on.
    pub fn date(&self) -> NaiveDate {
        match self {
            BoardWarning::AssignedOnVacation { date, .. }
            | BoardWarning::AssignedOnRestDay { date, .. }
            | BoardWarning::DoubleBooked { date, .. } => *date,
        }
    }

    /// Clinician the warning concerns.
    pub fn clinician_id(&self) -> &str {
        match self {
            BoardWarning::AssignedOnVacation { clinician_id, .. }
            | BoardWarning::AssignedOnRestDay { clinician_id, .. }
            | BoardWarning::DoubleBooked { clinician_id, .. } => clinician_id,
        }
    }
}

impl PoolBuckets {
    /// Members of one pool.
    pub fn get(&self, kind: PoolKind) -> &[String] {
        match kind {
            PoolKind::Unassigned => &self.unassigned,
            PoolKind::Vacation => &self.vacation,
            PoolKind::RestDay => &self.rest_day,
        }
    }

    /// Pool containing a clinician, if any.
    pub fn pool_of(&self, clinician_id: &str) -> Option<PoolKind> {
        [PoolKind::Vacation, PoolKind::RestDay, PoolKind::Unassigned]
            .into_iter()
            .find(|&kind| self.get(kind).iter().any(|c| c == clinician_id))
    }

    /// Total clinicians across pools.
    pub fn len(&self) -> usize {
        self.unassigned.len() + self.vacation.len() + self.rest_day.len()
    }

    /// Whether all pools are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DayView {
    /// Clinicians in a concrete row.
    pub fn cell(&self, row_id: &str) -> &[String] {
        self.cells.get(row_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows a clinician is placed in, in row id order.
    pub fn rows_of(&self, clinician_id: &str) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|(_, members)| members.iter().any(|c| c == clinician_id))
            .map(|(row, _)| row.as_str())
            .collect()
    }

    /// Free segments of a clinician. Empty for vacation and rest days.
    pub fn free_time_of(&self, clinician_id: &str) -> &[TimeRange] {
        self.free_time.get(clinician_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl BoardView {
    /// View of one date.
    pub fn day(&self, date: NaiveDate) -> Option<&DayView> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// Derives the board for the request's date span.
///
/// Fails only on invalid settings or an empty span. Dangling references
/// and malformed shift times are skipped, never reported as errors.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use clinic_rota::board::{derive_board, BoardRequest};
/// use clinic_rota::models::{Assignment, Clinician, Row, ShiftWindow};
///
/// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let request = BoardRequest::new(day, 1)
///     .with_rows(vec![Row::class("mri-am", "mri").with_shift(ShiftWindow::new("08:00", "12:00"))])
///     .with_clinicians(vec![Clinician::new("c1"), Clinician::new("c2")])
///     .with_roster(vec![Assignment::new("a1", "mri-am", day, "c1")]);
///
/// let view = derive_board(&request).unwrap();
/// assert_eq!(view.days[0].cell("mri-am"), ["c1"]);
/// assert_eq!(view.days[0].pools.unassigned, ["c2"]);
/// ```
pub fn derive_board(request: &BoardRequest) -> RotaResult<BoardView> {
    request.settings.validate()?;
    if request.days == 0 {
        return Err(RotaError::EmptySpan(request.first_day));
    }

    let index = BoardIndex::new(request);
    let placed = index.resolve(&request.roster.assignments);
    // Shifts hidden by vacation force no rest.
    let shown = placed
        .iter()
        .filter(|p| !request.clinicians[p.order].is_on_vacation(p.assignment.date))
        .map(|p| p.assignment);
    let rest_days = infer_rest_days(shown, &request.rows, &request.settings.on_call_rest);

    let mut by_clinician: HashMap<usize, Vec<Placed<'_>>> = HashMap::new();
    for p in &placed {
        by_clinician.entry(p.order).or_default().push(*p);
    }

    let mut warnings = Vec::new();
    let days: Vec<DayView> = request
        .dates()
        .map(|date| derive_day(request, date, &placed, &by_clinician, &rest_days, &mut warnings))
        .collect();

    warnings.extend(double_bookings(request, &by_clinician));
    warnings.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| index.order(a.clinician_id()).cmp(&index.order(b.clinician_id())))
    });

    debug!(
        days = days.len(),
        assignments = placed.len(),
        rest_days = rest_days.len(),
        warnings = warnings.len(),
        "derived board"
    );

    Ok(BoardView { days, warnings })
}

fn derive_day(
    request: &BoardRequest,
    date: NaiveDate,
    placed: &[Placed<'_>],
    by_clinician: &HashMap<usize, Vec<Placed<'_>>>,
    rest_days: &RestDays,
    warnings: &mut Vec<BoardWarning>,
) -> DayView {
    let mut members: HashMap<&str, BTreeSet<usize>> = HashMap::new();
    let mut assigned: BTreeSet<usize> = BTreeSet::new();

    for p in placed.iter().filter(|p| p.assignment.date == date) {
        let clinician = &request.clinicians[p.order];
        if clinician.is_on_vacation(date) {
            warnings.push(BoardWarning::AssignedOnVacation {
                date,
                clinician_id: clinician.id.clone(),
                assignment_id: p.assignment.id.clone(),
            });
            continue;
        }
        if rest_days.contains(&clinician.id, date) {
            warnings.push(BoardWarning::AssignedOnRestDay {
                date,
                clinician_id: clinician.id.clone(),
                assignment_id: p.assignment.id.clone(),
            });
        }
        members.entry(p.row.id.as_str()).or_default().insert(p.order);
        assigned.insert(p.order);
    }

    let cells: BTreeMap<String, Vec<String>> = request
        .rows
        .iter()
        .filter(|r| !r.is_pool())
        .map(|r| {
            let ids: Vec<String> = members
                .get(r.id.as_str())
                .into_iter()
                .flatten()
                .map(|&i| request.clinicians[i].id.clone())
                .collect();
            (r.id.clone(), ids)
        })
        .collect();

    let mut pools = PoolBuckets::default();
    let mut free_time = BTreeMap::new();
    for (order, clinician) in request.clinicians.iter().enumerate() {
        if clinician.is_on_vacation(date) {
            pools.vacation.push(clinician.id.clone());
            continue;
        }
        let is_assigned = assigned.contains(&order);
        if !is_assigned && rest_days.contains(&clinician.id, date) {
            pools.rest_day.push(clinician.id.clone());
            continue;
        }
        if !is_assigned {
            pools.unassigned.push(clinician.id.clone());
        }

        let busy = by_clinician
            .get(&order)
            .into_iter()
            .flatten()
            .filter(|p| {
                let back = days_between(p.assignment.date, date);
                (0..=i64::from(MAX_END_DAY_OFFSET)).contains(&back)
                    && !clinician.is_on_vacation(p.assignment.date)
            })
            .filter_map(|p| p.interval_from(date));
        free_time.insert(
            clinician.id.clone(),
            subtract_ranges(request.settings.day_window, busy),
        );
    }

    DayView {
        date,
        cells,
        pools,
        free_time,
    }
}

/// Finds overlapping assignment pairs per clinician.
///
/// Pairs are reported on the earlier assignment's date and only when
/// that date is inside the view span.
fn double_bookings(
    request: &BoardRequest,
    by_clinician: &HashMap<usize, Vec<Placed<'_>>>,
) -> Vec<BoardWarning> {
    // A shift overlaps later ones starting at most MAX_END_DAY_OFFSET days on.
    let reach = i64::from(request.days) + i64::from(MAX_END_DAY_OFFSET);
    let mut found = Vec::new();
    for (&order, items) in by_clinician {
        let clinician = &request.clinicians[order];
        let mut timed: Vec<(NaiveDate, &str, TimeRange)> = items
            .iter()
            .filter(|p| (0..reach).contains(&days_between(request.first_day, p.assignment.date)))
            .filter(|p| !clinician.is_on_vacation(p.assignment.date))
            .filter_map(|p| {
                p.interval_from(request.first_day)
                    .map(|r| (p.assignment.date, p.assignment.id.as_str(), r))
            })
            .collect();
        timed.sort_by_key(|&(_, _, r)| r);

        for (i, &(date, first, a)) in timed.iter().enumerate() {
            for &(_, second, b) in timed.iter().skip(i + 1) {
                if b.start >= a.end {
                    break;
                }
                if a.overlaps(&b) && request.in_span(date) {
                    found.push(BoardWarning::DoubleBooked {
                        date,
                        clinician_id: clinician.id.clone(),
                        first_assignment_id: first.to_string(),
                        second_assignment_id: second.to_string(),
                    });
                }
            }
        }
    }
    found
}
