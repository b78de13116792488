//! Line use-cases

mod locks;
mod service;

pub use locks::{LineGuard, LineLocks};
pub use service::{AddSectionCommand, CreateLineCommand, LineService, LineView, UpdateLineCommand};
