//! Error types for rota derivation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while deriving or editing a rota board.
#[derive(Error, Debug)]
pub enum RotaError {
    #[error("Unknown row: {0}")]
    UnknownRow(String),

    #[error("Unknown clinician: {0}")]
    UnknownClinician(String),

    #[error("Unknown assignment: {0}")]
    UnknownAssignment(String),

    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("Date span starting {0} covers no days")]
    EmptySpan(NaiveDate),

    #[error("Move of clinician '{clinician_id}' to '{row_id}' on {date} is blocked")]
    MoveBlocked {
        clinician_id: String,
        row_id: String,
        date: NaiveDate,
    },
}

/// Result type alias for rota operations.
pub type RotaResult<T> = Result<T, RotaError>;
