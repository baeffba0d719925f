//! Card and header dragging
//!
//! - handle: DOM id strings ↔ typed drag targets
//! - apply: the shared move routine
//! - engine: gesture state machine

mod apply;
mod engine;
mod handle;

pub use apply::{apply_move, CardMove, MoveEffect, MoveMode};
pub use engine::{resolve_target_cell, DragEngine, DragOptions, DragState, DragSubject, DropOutcome};
pub use handle::DragHandle;
