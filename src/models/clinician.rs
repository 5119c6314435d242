//! Clinician model.
//!
//! A clinician is the human resource placed into rota cells. Besides
//! identity it carries the shift classes it is qualified for and its
//! vacation periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A schedulable clinician.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinician {
    /// Unique clinician identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Class ids this clinician may be assigned to.
    #[serde(default)]
    pub qualified_classes: Vec<String>,
    /// Vacation periods.
    #[serde(default)]
    pub vacations: Vec<VacationRange>,
}

/// A vacation period on calendar dates, inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacationRange {
    /// First vacation day.
    pub start: NaiveDate,
    /// Last vacation day.
    pub end: NaiveDate,
}

impl VacationRange {
    /// Creates a new vacation range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether a date falls within this range.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the end precedes the start.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

impl Clinician {
    /// Creates a clinician with no qualifications or vacations.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualified_classes: Vec::new(),
            vacations: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a qualified class.
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.qualified_classes.push(class_id.into());
        self
    }

    /// Adds a vacation period (inclusive).
    pub fn with_vacation(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.vacations.push(VacationRange::new(start, end));
        self
    }

    /// Whether the clinician is on vacation on `date`.
    pub fn is_on_vacation(&self, date: NaiveDate) -> bool {
        self.vacations.iter().any(|v| v.contains(date))
    }

    /// Whether the clinician may work shifts of `class_id`.
    pub fn is_qualified_for(&self, class_id: &str) -> bool {
        self.qualified_classes.iter().any(|c| c == class_id)
    }
}
