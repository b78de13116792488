//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::line::LineRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::station::StationRepository;

use super::line_repository::SeaOrmLineRepository;
use super::station_repository::SeaOrmStationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let line = repos.lines().find_by_id(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    lines: SeaOrmLineRepository,
    stations: SeaOrmStationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            lines: SeaOrmLineRepository::new(db.clone()),
            stations: SeaOrmStationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn lines(&self) -> &dyn LineRepository {
        &self.lines
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }
}
