//! Assignment records and the roster that holds them.
//!
//! An assignment places one clinician into one row on one date. The
//! roster is the raw, ungrouped list as it arrives from storage or the
//! solver; grouping and pool derivation happen in [`crate::board`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A clinician ↔ row ↔ date tuple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: String,
    /// Target row (concrete slot or pool).
    pub row_id: String,
    /// Calendar date of the shift start.
    pub date: NaiveDate,
    /// Assigned clinician.
    pub clinician_id: String,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        id: impl Into<String>,
        row_id: impl Into<String>,
        date: NaiveDate,
        clinician_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            row_id: row_id.into(),
            date,
            clinician_id: clinician_id.into(),
        }
    }

    /// Whether this assignment sits in the given cell.
    #[inline]
    pub fn is_in_cell(&self, row_id: &str, date: NaiveDate) -> bool {
        self.row_id == row_id && self.date == date
    }
}

/// The raw list of assignments of a rota.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// All assignments, in insertion order.
    pub assignments: Vec<Assignment>,
}

impl From<Vec<Assignment>> for Roster {
    fn from(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Removes and returns the assignment with `id`.
    pub fn remove(&mut self, id: &str) -> Option<Assignment> {
        let idx = self.assignments.iter().position(|a| a.id == id)?;
        Some(self.assignments.remove(idx))
    }

    /// Finds an assignment by id.
    pub fn find(&self, id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Finds an assignment by id for modification.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.id == id)
    }

    /// Returns all assignments of a clinician.
    pub fn for_clinician(&self, clinician_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.clinician_id == clinician_id)
            .collect()
    }

    /// Returns all assignments in one cell.
    pub fn for_cell(&self, row_id: &str, date: NaiveDate) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.is_in_cell(row_id, date))
            .collect()
    }

    /// Returns all assignments on a date.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.date == date).collect()
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the roster holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
