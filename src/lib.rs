//! Assignment rendering and availability derivation for clinical rotas.
//!
//! Takes raw per-cell assignment records, clinician vacations, on-call
//! rest rules, and solver settings, and derives what a rota grid shows.
//! The shift solver itself lives elsewhere; this crate only interprets
//! its output and the edits made on top of it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Clinician`, `Row`, `Assignment`, `Roster`,
//!   `TimeRange`, `ShiftWindow`, `SolverSettings`
//! - **`board`**: Derivation (`derive_board`), rest-day inference, free
//!   time, drag-and-drop legality (`check_move`), and board summaries
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, malformed shift times, inconsistent settings)
//! - **`error`**: `RotaError` and `RotaResult`
//!
//! # Invariants
//!
//! - Vacation always takes priority over rest-day and unassigned pools.
//! - A shift whose interval cannot be parsed, or ends at or before its
//!   start, never causes a conflict and blocks no free time.
//! - Touching intervals do not overlap.

pub mod board;
pub mod error;
pub mod models;
pub mod validation;

pub use error::{RotaError, RotaResult};
