pub mod line;
pub mod repositories;
pub mod station;

pub use line::{Line, LineRepository, Section};
pub use repositories::{DomainResult, RepositoryProvider};
pub use station::{Station, StationRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
