//! Board derivation and drag-and-drop legality.
//!
//! Turns raw assignments into what the rota grid shows: cells per row and
//! date, pool membership, free time, and data warnings. Also decides
//! whether a dragged clinician may be dropped into a cell.
//!
//! # Pool Priority
//!
//! Vacation > rest day > unassigned. A clinician with a concrete
//! assignment is in no pool unless on vacation, in which case the
//! assignment is hidden and reported as a warning.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use clinic_rota::board::{derive_board, BoardRequest, BoardSummary};
//! use clinic_rota::models::{Clinician, Row};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let request = BoardRequest::new(day, 7)
//!     .with_rows(Row::pools())
//!     .with_clinicians(vec![Clinician::new("c1")]);
//!
//! let view = derive_board(&request).unwrap();
//! let summary = BoardSummary::calculate(&view);
//! assert_eq!(summary.days.len(), 7);
//! ```

mod context;
mod derive;
mod kpi;
mod moves;
mod rest_days;

pub use context::BoardRequest;
pub use derive::{derive_board, BoardView, BoardWarning, DayView, PoolBuckets};
pub use kpi::{BoardSummary, DaySummary};
pub use moves::{check_move, MoveCheck, MoveConflict, MoveEffect, MoveOutcome, MoveRequest, MoveSource};
pub use rest_days::{infer_rest_days, RestDays};
