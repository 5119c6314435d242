//! Drag-and-drop legality.
//!
//! A move drops a clinician into a target cell, either by dragging an
//! existing assignment or by pulling the clinician out of a pool. The
//! check compares the target against the clinician's other concrete
//! assignments and availability.
//!
//! # Conflicts
//!
//! | Conflict | Blocking | Condition |
//! |----------|----------|-----------|
//! | AlreadyInCell | yes | clinician already sits in the target cell |
//! | OnVacation | yes | target date is a vacation day |
//! | RestDay | yes | target date is a forced rest day |
//! | BreaksRestDay | yes | on-call target forces rest on an assigned day |
//! | MultipleShiftsPerDay | yes | another shift that day, multiple not allowed |
//! | TimeOverlap | yes | shift intervals overlap, across midnight too |
//! | DifferentLocation | yes | location differs from another shift that day |
//! | NotQualified | no | clinician lacks the row's class |
//!
//! Dropping onto a pool row un-assigns and is always allowed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::context::{days_between, BoardIndex, BoardRequest, Placed};
use super::rest_days::infer_rest_days;
use crate::error::{RotaError, RotaResult};
use crate::models::time::MAX_END_DAY_OFFSET;
use crate::models::{Assignment, Clinician};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveSource {
    /// An existing assignment, by id.
    Assignment(String),
    /// A clinician pulled out of a pool, by clinician id.
    Pool(String),
}

/// A drop onto a target cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Dragged item.
    pub source: MoveSource,
    /// Target row.
    pub target_row: String,
    /// Target date.
    pub target_date: NaiveDate,
}

impl MoveRequest {
    /// Drags an existing assignment.
    pub fn reassign(
        assignment_id: impl Into<String>,
        target_row: impl Into<String>,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            source: MoveSource::Assignment(assignment_id.into()),
            target_row: target_row.into(),
            target_date,
        }
    }

    /// Drags a clinician out of a pool.
    pub fn from_pool(
        clinician_id: impl Into<String>,
        target_row: impl Into<String>,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            source: MoveSource::Pool(clinician_id.into()),
            target_row: target_row.into(),
            target_date,
        }
    }
}

/// A reason a move is illegal or questionable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "type")]
pub enum MoveConflict {
    /// The clinician already sits in the target cell.
    AlreadyInCell { assignment_id: String },
    /// The target date is a vacation day.
    OnVacation,
    /// The target date is a forced rest day.
    RestDay,
    /// The on-call target would force rest on a day the clinician works.
    BreaksRestDay {
        assignment_id: String,
        date: NaiveDate,
    },
    /// Another shift on the same day while multiple shifts are not allowed.
    MultipleShiftsPerDay { assignment_id: String, row_id: String },
    /// Shift intervals overlap.
    TimeOverlap {
        assignment_id: String,
        row_id: String,
        date: NaiveDate,
    },
    /// Another shift on the same day is at a different location.
    DifferentLocation {
        assignment_id: String,
        location: String,
    },
    /// The clinician is not qualified for the row's class.
    NotQualified { class_id: String },
}

impl MoveConflict {
    /// Whether this conflict forbids the move.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, MoveConflict::NotQualified { .. })
    }
}

/// Result of a legality check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCheck {
    /// Clinician being moved.
    pub clinician_id: String,
    /// All conflicts found, blocking first in check order.
    pub conflicts: Vec<MoveConflict>,
}

impl MoveCheck {
    /// Whether the move has no blocking conflict.
    pub fn is_allowed(&self) -> bool {
        !self.conflicts.iter().any(MoveConflict::is_blocking)
    }

    /// Blocking conflicts.
    pub fn blocking(&self) -> impl Iterator<Item = &MoveConflict> {
        self.conflicts.iter().filter(|c| c.is_blocking())
    }

    /// Non-blocking conflicts.
    pub fn warnings(&self) -> impl Iterator<Item = &MoveConflict> {
        self.conflicts.iter().filter(|c| !c.is_blocking())
    }
}

/// Effect of an applied move on the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveEffect {
    /// An existing assignment was re-targeted.
    Moved(Assignment),
    /// A new assignment was created for a pooled clinician.
    Created(Assignment),
    /// An assignment was dropped onto a pool and removed.
    Removed(Assignment),
    /// A pooled clinician was dropped onto a pool.
    Unchanged,
}

/// An applied move with its non-blocking warnings.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Roster change.
    pub effect: MoveEffect,
    /// Non-blocking conflicts the move was applied despite.
    pub warnings: Vec<MoveConflict>,
}

/// Checks whether a move is legal.
///
/// Invalid settings and unknown rows, clinicians, or assignments are
/// errors; everything else is reported as [`MoveConflict`]s.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use clinic_rota::board::{check_move, BoardRequest, MoveConflict, MoveRequest};
/// use clinic_rota::models::{Assignment, Clinician, Row, ShiftWindow};
///
/// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let request = BoardRequest::new(day, 1)
///     .with_rows(vec![
///         Row::class("mri-am", "mri").with_shift(ShiftWindow::new("08:00", "12:00")),
///         Row::class("ct-am", "ct").with_shift(ShiftWindow::new("09:00", "13:00")),
///     ])
///     .with_clinicians(vec![Clinician::new("c1").with_class("mri").with_class("ct")])
///     .with_roster(vec![Assignment::new("a1", "mri-am", day, "c1")]);
///
/// let check = check_move(&request, &MoveRequest::from_pool("c1", "ct-am", day)).unwrap();
/// assert!(!check.is_allowed());
/// assert!(matches!(check.conflicts[0], MoveConflict::MultipleShiftsPerDay { .. }));
/// ```
pub fn check_move(request: &BoardRequest, mv: &MoveRequest) -> RotaResult<MoveCheck> {
    request.settings.validate()?;
    let index = BoardIndex::new(request);
    let target = index
        .row(&mv.target_row)
        .ok_or_else(|| RotaError::UnknownRow(mv.target_row.clone()))?;
    let (moved_id, clinician) = resolve_source(request, &index, &mv.source)?;

    let mut check = MoveCheck {
        clinician_id: clinician.id.clone(),
        conflicts: Vec::new(),
    };
    if target.is_pool() {
        return Ok(check);
    }

    let date = mv.target_date;
    let settings = &request.settings;
    let others: Vec<Placed<'_>> = index
        .resolve(
            request
                .roster
                .assignments
                .iter()
                .filter(|a| a.clinician_id == clinician.id && Some(a.id.as_str()) != moved_id),
        )
        .into_iter()
        .filter(|p| !clinician.is_on_vacation(p.assignment.date))
        .collect();
    let same_day: Vec<&Placed<'_>> = others.iter().filter(|p| p.assignment.date == date).collect();

    let conflicts = &mut check.conflicts;
    if let Some(p) = same_day.iter().find(|p| p.row.id == target.id) {
        conflicts.push(MoveConflict::AlreadyInCell {
            assignment_id: p.assignment.id.clone(),
        });
    }

    if clinician.is_on_vacation(date) {
        conflicts.push(MoveConflict::OnVacation);
    }

    if let Some(on_call) = settings.on_call_rest.active_class() {
        // Rest days as they would stand without the dragged assignment.
        let rest = infer_rest_days(
            others.iter().map(|p| p.assignment),
            &request.rows,
            &settings.on_call_rest,
        );

        if target.is_class(on_call) {
            let dropped = Assignment::new("", &target.id, date, &clinician.id);
            let forced = infer_rest_days(
                others.iter().map(|p| p.assignment).chain([&dropped]),
                &request.rows,
                &settings.on_call_rest,
            );
            if forced.contains(&clinician.id, date) {
                conflicts.push(MoveConflict::RestDay);
            }
            for p in &others {
                let d = p.assignment.date;
                if forced.contains(&clinician.id, d) && !rest.contains(&clinician.id, d) {
                    conflicts.push(MoveConflict::BreaksRestDay {
                        assignment_id: p.assignment.id.clone(),
                        date: d,
                    });
                }
            }
        } else if rest.contains(&clinician.id, date) {
            conflicts.push(MoveConflict::RestDay);
        }
    }

    if !settings.allow_multiple_shifts_per_day {
        for p in same_day.iter().filter(|p| p.row.id != target.id) {
            conflicts.push(MoveConflict::MultipleShiftsPerDay {
                assignment_id: p.assignment.id.clone(),
                row_id: p.row.id.clone(),
            });
        }
    }

    if let Some(interval) = target.interval() {
        let window = i64::from(MAX_END_DAY_OFFSET);
        for p in &others {
            let offset = days_between(date, p.assignment.date);
            if !(-window..=window).contains(&offset) {
                continue;
            }
            // Same-day pairs are already reported when only one shift is allowed.
            if offset == 0 && !settings.allow_multiple_shifts_per_day {
                continue;
            }
            if p.row.id == target.id && offset == 0 {
                continue;
            }
            if p.interval_from(date).is_some_and(|other| other.overlaps(&interval)) {
                conflicts.push(MoveConflict::TimeOverlap {
                    assignment_id: p.assignment.id.clone(),
                    row_id: p.row.id.clone(),
                    date: p.assignment.date,
                });
            }
        }
    }

    if settings.enforce_same_location_per_day {
        if let Some(location) = target.location.as_deref() {
            for p in &same_day {
                match p.row.location.as_deref() {
                    Some(other) if other != location => {
                        conflicts.push(MoveConflict::DifferentLocation {
                            assignment_id: p.assignment.id.clone(),
                            location: other.to_string(),
                        });
                    }
                    _ => {}
                }
            }
        }
    }

    if let Some(class_id) = target.class_id.as_deref() {
        if !clinician.is_qualified_for(class_id) {
            conflicts.push(MoveConflict::NotQualified {
                class_id: class_id.to_string(),
            });
        }
    }

    debug!(
        clinician = %check.clinician_id,
        row = %target.id,
        %date,
        conflicts = check.conflicts.len(),
        allowed = check.is_allowed(),
        "checked move"
    );
    Ok(check)
}

fn resolve_source<'a>(
    request: &'a BoardRequest,
    index: &BoardIndex<'a>,
    source: &'a MoveSource,
) -> RotaResult<(Option<&'a str>, &'a Clinician)> {
    let (moved_id, clinician_id) = match source {
        MoveSource::Assignment(id) => {
            let a = request
                .roster
                .find(id)
                .ok_or_else(|| RotaError::UnknownAssignment(id.clone()))?;
            (Some(id.as_str()), a.clinician_id.as_str())
        }
        MoveSource::Pool(clinician_id) => (None, clinician_id.as_str()),
    };
    let (_, clinician) = index
        .clinician(clinician_id)
        .ok_or_else(|| RotaError::UnknownClinician(clinician_id.to_string()))?;
    Ok((moved_id, clinician))
}

impl BoardRequest {
    /// Checks a move and applies it to the roster.
    ///
    /// Fails with [`RotaError::MoveBlocked`] when any blocking conflict
    /// exists; the roster is left untouched in that case.
    pub fn apply_move(&mut self, mv: &MoveRequest) -> RotaResult<MoveOutcome> {
        let check = check_move(self, mv)?;
        if !check.is_allowed() {
            return Err(RotaError::MoveBlocked {
                clinician_id: check.clinician_id,
                row_id: mv.target_row.clone(),
                date: mv.target_date,
            });
        }
        let to_pool = self.rows.iter().any(|r| r.id == mv.target_row && r.is_pool());

        let effect = match (&mv.source, to_pool) {
            (MoveSource::Assignment(id), true) => {
                let removed = self
                    .roster
                    .remove(id)
                    .ok_or_else(|| RotaError::UnknownAssignment(id.clone()))?;
                MoveEffect::Removed(removed)
            }
            (MoveSource::Assignment(id), false) => {
                let a = self
                    .roster
                    .find_mut(id)
                    .ok_or_else(|| RotaError::UnknownAssignment(id.clone()))?;
                a.row_id = mv.target_row.clone();
                a.date = mv.target_date;
                MoveEffect::Moved(a.clone())
            }
            (MoveSource::Pool(_), true) => MoveEffect::Unchanged,
            (MoveSource::Pool(clinician_id), false) => {
                let created = Assignment::new(
                    Uuid::new_v4().to_string(),
                    &mv.target_row,
                    mv.target_date,
                    clinician_id,
                );
                self.roster.add(created.clone());
                MoveEffect::Created(created)
            }
        };

        Ok(MoveOutcome {
            effect,
            warnings: check.warnings().cloned().collect(),
        })
    }
}
