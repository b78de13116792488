//! Station repository interface

use async_trait::async_trait;

use super::model::Station;
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>>;
    /// Order and duplicates of `ids` are not preserved; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Station>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Station>>;
    async fn find_all(&self) -> DomainResult<Vec<Station>>;
    async fn save(&self, station: Station) -> DomainResult<Station>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
