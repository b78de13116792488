//! Line repository interface

use async_trait::async_trait;

use super::model::Line;
use crate::domain::DomainResult;

/// Persists the line aggregate together with its full section chain.
#[async_trait]
pub trait LineRepository: Send + Sync {
    /// Insert when `line.id() == 0`, otherwise replace the stored line and
    /// its sections in one unit. Returns the stored aggregate.
    async fn save(&self, line: Line) -> DomainResult<Line>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Line>>;
    async fn find_all(&self) -> DomainResult<Vec<Line>>;
    /// Remove the line and all of its sections.
    async fn delete_by_id(&self, id: i32) -> DomainResult<()>;
    /// Whether any section of any line starts or ends at the station.
    async fn references_station(&self, station_id: i32) -> DomainResult<bool>;
}
