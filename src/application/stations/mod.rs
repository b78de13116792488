//! Station use-cases

mod guard;
mod service;

pub use guard::StationGuard;
pub use service::StationService;
