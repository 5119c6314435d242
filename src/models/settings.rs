//! Solver settings.
//!
//! The same settings payload is exchanged with the external shift solver;
//! the derivation engine reads the subset that affects availability and
//! drag-and-drop legality. Every field is optional in the JSON form and
//! falls back to [`SolverSettings::default`].

use serde::{Deserialize, Serialize};

use super::time::TimeRange;
use crate::error::{RotaError, RotaResult};

/// Longest rest window, in days, on either side of an on-call shift.
pub const MAX_REST_WINDOW_DAYS: u32 = 366;

/// Flags controlling assignment legality and availability derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverSettings {
    /// Whether a clinician may hold more than one shift per day.
    pub allow_multiple_shifts_per_day: bool,
    /// Whether all of a clinician's shifts on a day must share a location.
    pub enforce_same_location_per_day: bool,
    /// Rest days forced around on-call shifts.
    pub on_call_rest: OnCallRestRule,
    /// Window in which free time is reported.
    pub day_window: TimeRange,
}

/// Rest days before and after an on-call assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OnCallRestRule {
    /// Whether the rule is active.
    pub enabled: bool,
    /// Class id of on-call rows.
    pub class_id: Option<String>,
    /// Forced rest days before each on-call day.
    pub days_before: u32,
    /// Forced rest days after each on-call day.
    pub days_after: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            allow_multiple_shifts_per_day: false,
            enforce_same_location_per_day: false,
            on_call_rest: OnCallRestRule::default(),
            day_window: TimeRange::full_day(),
        }
    }
}

impl OnCallRestRule {
    /// Creates an enabled rule for `class_id`.
    pub fn new(class_id: impl Into<String>, days_before: u32, days_after: u32) -> Self {
        Self {
            enabled: true,
            class_id: Some(class_id.into()),
            days_before,
            days_after,
        }
    }

    /// The on-call class id when the rule is enabled.
    pub fn active_class(&self) -> Option<&str> {
        if self.enabled {
            self.class_id.as_deref()
        } else {
            None
        }
    }
}

impl SolverSettings {
    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> RotaResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Allows multiple shifts per day.
    pub fn with_multiple_shifts(mut self, allow: bool) -> Self {
        self.allow_multiple_shifts_per_day = allow;
        self
    }

    /// Enforces a single location per day.
    pub fn with_same_location(mut self, enforce: bool) -> Self {
        self.enforce_same_location_per_day = enforce;
        self
    }

    /// Sets the on-call rest rule.
    pub fn with_on_call_rest(mut self, rule: OnCallRestRule) -> Self {
        self.on_call_rest = rule;
        self
    }

    /// Sets the free-time window.
    pub fn with_day_window(mut self, window: TimeRange) -> Self {
        self.day_window = window;
        self
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> RotaResult<()> {
        if self.day_window.is_empty() {
            return Err(RotaError::InvalidSettings(format!(
                "day window {} is empty",
                self.day_window
            )));
        }
        if self.on_call_rest.enabled && self.on_call_rest.class_id.is_none() {
            return Err(RotaError::InvalidSettings(
                "on-call rest rule is enabled without a class id".into(),
            ));
        }
        let rule = &self.on_call_rest;
        if rule.days_before > MAX_REST_WINDOW_DAYS || rule.days_after > MAX_REST_WINDOW_DAYS {
            return Err(RotaError::InvalidSettings(format!(
                "on-call rest window {}/{} days exceeds {MAX_REST_WINDOW_DAYS}",
                rule.days_before, rule.days_after
            )));
        }
        Ok(())
    }
}
