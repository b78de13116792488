//! In-memory repository provider
//!
//! Used for tests and for running the service without a database
//! (`database.storage = "memory"`). Each line is stored as a whole
//! aggregate, so a save replaces the line and its sections together.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::line::{Line, LineRepository};
use crate::domain::station::{Station, StationRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

// ── Lines ───────────────────────────────────────────────────────

pub struct InMemoryLineRepository {
    lines: DashMap<i32, Line>,
    counter: AtomicI32,
}

impl InMemoryLineRepository {
    pub fn new() -> Self {
        Self {
            lines: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryLineRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineRepository for InMemoryLineRepository {
    async fn save(&self, line: Line) -> DomainResult<Line> {
        if line.is_persisted() {
            let Some(mut slot) = self.lines.get_mut(&line.id()) else {
                return Err(DomainError::not_found("Line", line.id()));
            };
            *slot = line.clone();
            return Ok(line);
        }

        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let line = line.with_id(id);
        self.lines.insert(id, line.clone());
        Ok(line)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Line>> {
        Ok(self.lines.get(&id).map(|l| l.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Line>> {
        let mut lines: Vec<Line> = self.lines.iter().map(|e| e.value().clone()).collect();
        lines.sort_by_key(|l| l.id());
        Ok(lines)
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<()> {
        self.lines
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Line", id))?;
        Ok(())
    }

    async fn references_station(&self, station_id: i32) -> DomainResult<bool> {
        Ok(self
            .lines
            .iter()
            .any(|e| e.value().contains_station(station_id)))
    }
}

// ── Stations ────────────────────────────────────────────────────

pub struct InMemoryStationRepository {
    stations: DashMap<i32, Station>,
    counter: AtomicI32,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self {
            stations: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryStationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        Ok(self.stations.get(&id).map(|s| s.clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Station>> {
        Ok(self
            .stations
            .iter()
            .filter(|e| ids.contains(e.key()))
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Station>> {
        Ok(self
            .stations
            .iter()
            .find(|e| e.value().name == name)
            .map(|e| e.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let mut stations: Vec<Station> =
            self.stations.iter().map(|e| e.value().clone()).collect();
        stations.sort_by_key(|s| s.id);
        Ok(stations)
    }

    async fn save(&self, mut station: Station) -> DomainResult<Station> {
        if station.id == 0 {
            station.id = self.counter.fetch_add(1, Ordering::SeqCst);
        }
        self.stations.insert(station.id, station.clone());
        Ok(station)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.stations
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Station", id))?;
        Ok(())
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    lines: InMemoryLineRepository,
    stations: InMemoryStationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn lines(&self) -> &dyn LineRepository {
        &self.lines
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }
}
