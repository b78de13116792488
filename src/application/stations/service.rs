//! Station management service

use std::sync::Arc;

use tracing::info;

use super::guard::StationGuard;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Station};

pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
    guard: StationGuard,
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, guard: StationGuard) -> Self {
        Self { repos, guard }
    }

    /// Register a station. Names are unique.
    pub async fn create_station(&self, name: &str) -> DomainResult<Station> {
        let station = Station::new(name)?;

        if self
            .repos
            .stations()
            .find_by_name(&station.name)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Station '{}' already exists",
                station.name
            )));
        }

        let saved = self.repos.stations().save(station).await?;
        info!(station_id = saved.id, name = %saved.name, "Station created");
        Ok(saved)
    }

    pub async fn find_all_stations(&self) -> DomainResult<Vec<Station>> {
        self.repos.stations().find_all().await
    }

    pub async fn find_station(&self, id: i32) -> DomainResult<Station> {
        self.repos
            .stations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", id))
    }

    /// Delete a station no line runs through.
    pub async fn delete_station(&self, id: i32) -> DomainResult<()> {
        let _detached = self.guard.detach().await;
        self.find_station(id).await?;

        if self.repos.lines().references_station(id).await? {
            return Err(DomainError::Conflict(format!(
                "Station {} is still part of a line",
                id
            )));
        }

        self.repos.stations().delete(id).await?;
        info!(station_id = id, "Station deleted");
        Ok(())
    }
}
