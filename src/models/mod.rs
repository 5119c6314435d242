//! Rota domain models.
//!
//! Provides the data types the derivation engine reads: clinicians, grid
//! rows, raw assignments, shift time arithmetic, and solver settings.
//!
//! # Domain Mapping
//!
//! | clinic-rota | Grid | Meaning |
//! |-------------|------|---------|
//! | Row | Line | Concrete shift slot or synthetic pool |
//! | Assignment | Chip in a cell | Clinician placed in a row on a date |
//! | Clinician | Chip | Person with classes and vacations |
//! | SolverSettings | - | Legality flags shared with the solver |

mod assignment;
mod clinician;
mod row;
mod settings;
pub mod time;

pub use assignment::{Assignment, Roster};
pub use clinician::{Clinician, VacationRange};
pub use row::{
    PoolKind, Row, RowKind, POOL_REST_DAY_ID, POOL_UNASSIGNED_ID, POOL_VACATION_ID,
};
pub use settings::{OnCallRestRule, SolverSettings, MAX_REST_WINDOW_DAYS};
pub use time::{ShiftWindow, TimeRange};
