//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to the per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::line::LineRepository;
use super::station::StationRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let line = repos.lines().find_by_id(1).await?;
///     let stations = repos.stations().find_by_ids(&[1, 2]).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn lines(&self) -> &dyn LineRepository;
    fn stations(&self) -> &dyn StationRepository;
}
