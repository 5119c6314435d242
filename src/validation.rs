//! Input validation for rota data.
//!
//! Derivation tolerates bad data by skipping it; validation reports it.
//! Detects:
//! - Duplicate IDs
//! - Assignments referencing missing rows or clinicians
//! - Inverted vacation ranges
//! - Concrete rows without a class or with a malformed shift time
//! - An on-call rest rule naming a class no row belongs to

use crate::board::BoardRequest;
use crate::models::{Assignment, Clinician, Row};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An assignment references a row that doesn't exist.
    InvalidRowReference,
    /// An assignment references a clinician that doesn't exist.
    InvalidClinicianReference,
    /// A vacation ends before it starts.
    InvertedVacation,
    /// A concrete row's shift time cannot be interpreted.
    MalformedShift,
    /// A concrete row has no class.
    MissingClass,
    /// Solver settings are inconsistent with themselves or the rows.
    InvalidSettings,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates rows, clinicians, and assignments.
///
/// Checks:
/// 1. No duplicate row IDs
/// 2. No duplicate clinician IDs
/// 3. No duplicate assignment IDs
/// 4. Every concrete row has a class
/// 5. Every concrete row with a shift time has a valid interval
/// 6. No vacation ends before it starts
/// 7. Every assignment references an existing row and clinician
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    rows: &[Row],
    clinicians: &[Clinician],
    assignments: &[Assignment],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut row_ids = HashSet::new();
    for r in rows {
        if !row_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate row ID: {}", r.id),
            ));
        }
        if r.is_pool() {
            continue;
        }
        if r.class_id.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingClass,
                format!("Row '{}' has no class", r.id),
            ));
        }
        if let Some(shift) = &r.shift {
            if shift.interval().is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MalformedShift,
                    format!(
                        "Row '{}' has malformed shift {}-{} (+{}d)",
                        r.id, shift.start, shift.end, shift.end_day_offset
                    ),
                ));
            }
        }
    }

    let mut clinician_ids = HashSet::new();
    for c in clinicians {
        if !clinician_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate clinician ID: {}", c.id),
            ));
        }
        for v in c.vacations.iter().filter(|v| v.is_inverted()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedVacation,
                format!(
                    "Clinician '{}' has vacation ending {} before its start {}",
                    c.id, v.end, v.start
                ),
            ));
        }
    }

    let mut assignment_ids = HashSet::new();
    for a in assignments {
        if !assignment_ids.insert(a.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate assignment ID: {}", a.id),
            ));
        }
        if !row_ids.contains(a.row_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRowReference,
                format!("Assignment '{}' references unknown row '{}'", a.id, a.row_id),
            ));
        }
        if !clinician_ids.contains(a.clinician_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidClinicianReference,
                format!(
                    "Assignment '{}' references unknown clinician '{}'",
                    a.id, a.clinician_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a full board request, settings included.
pub fn validate_request(request: &BoardRequest) -> ValidationResult {
    let mut errors = match validate_input(
        &request.rows,
        &request.clinicians,
        &request.roster.assignments,
    ) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if let Err(e) = request.settings.validate() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidSettings,
            e.to_string(),
        ));
    }

    if let Some(class_id) = request.settings.on_call_rest.active_class() {
        if !request.rows.iter().any(|r| !r.is_pool() && r.is_class(class_id)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSettings,
                format!("On-call rest rule names class '{class_id}' but no row has it"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
