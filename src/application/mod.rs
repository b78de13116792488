//! Application layer
//!
//! Services orchestrate repositories and aggregates. HTTP handlers are thin
//! wrappers that delegate here.

pub mod lines;
pub mod stations;

pub use lines::{AddSectionCommand, CreateLineCommand, LineService, LineView, UpdateLineCommand};
pub use stations::{StationGuard, StationService};
