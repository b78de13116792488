//! Line management service: application-layer orchestration
//!
//! Every mutation runs the same cycle under the line's lock: load the
//! aggregate, let it validate and apply the change, persist it. A rejected
//! change never reaches storage.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::locks::LineLocks;
use crate::application::stations::StationGuard;
use crate::domain::{DomainError, DomainResult, Line, RepositoryProvider, Station};

// ── Commands ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreateLineCommand {
    pub name: String,
    pub color: String,
    pub up_station_id: i32,
    pub down_station_id: i32,
    pub distance: i32,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateLineCommand {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddSectionCommand {
    pub up_station_id: i32,
    pub down_station_id: i32,
    pub distance: i32,
}

// ── Views ───────────────────────────────────────────────────────

/// Line with its stations resolved, ordered from the up terminus
#[derive(Debug, Clone)]
pub struct LineView {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub distance: i32,
    pub up_station: Station,
    pub down_station: Station,
    pub stations: Vec<Station>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LineView {
    /// `Err(station_id)` names the first station on the path that is missing.
    fn build(line: &Line, stations: &HashMap<i32, Station>) -> Result<Self, i32> {
        let path = line
            .station_path()
            .into_iter()
            .map(|id| stations.get(&id).cloned().ok_or(id))
            .collect::<Result<Vec<_>, _>>()?;

        let (Some(up), Some(down)) = (path.first().cloned(), path.last().cloned()) else {
            return Err(line.up_station_id());
        };

        Ok(Self {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            distance: line.distance(),
            up_station: up,
            down_station: down,
            stations: path,
            created_at: line.created_at(),
            updated_at: line.updated_at(),
        })
    }
}

// ── Service ─────────────────────────────────────────────────────

pub struct LineService {
    repos: Arc<dyn RepositoryProvider>,
    locks: LineLocks,
    stations: StationGuard,
}

impl LineService {
    /// `stations` must be the guard shared with the [`StationService`] over
    /// the same repositories.
    ///
    /// [`StationService`]: crate::application::StationService
    pub fn new(repos: Arc<dyn RepositoryProvider>, stations: StationGuard) -> Self {
        Self {
            repos,
            locks: LineLocks::new(),
            stations,
        }
    }

    /// Create a line with its first section.
    pub async fn create_line(&self, cmd: CreateLineCommand) -> DomainResult<LineView> {
        let line = Line::new(
            &cmd.name,
            &cmd.color,
            cmd.up_station_id,
            cmd.down_station_id,
            cmd.distance,
        )?;
        let _attached = self.stations.attach().await;
        self.ensure_stations_exist(&[cmd.up_station_id, cmd.down_station_id])
            .await?;

        let saved = self.repos.lines().save(line).await?;
        metrics::counter!("lines_created_total").increment(1);
        info!(
            line_id = saved.id(),
            name = saved.name(),
            up = saved.up_station_id(),
            down = saved.down_station_id(),
            "Line created"
        );

        self.view(&saved).await
    }

    /// All lines in id order. Lines referring to a vanished station are
    /// skipped rather than failing the whole listing.
    pub async fn find_all_lines(&self) -> DomainResult<Vec<LineView>> {
        let lines = self.repos.lines().find_all().await?;

        let mut ids: Vec<i32> = lines.iter().flat_map(|l| l.station_path()).collect();
        ids.sort_unstable();
        ids.dedup();
        let stations = self.station_map(&ids).await?;

        Ok(lines
            .iter()
            .filter_map(|line| match LineView::build(line, &stations) {
                Ok(view) => Some(view),
                Err(missing) => {
                    warn!(
                        line_id = line.id(),
                        station_id = missing,
                        "Skipping line with unresolved station"
                    );
                    None
                }
            })
            .collect())
    }

    pub async fn find_line(&self, id: i32) -> DomainResult<LineView> {
        let line = self.load(id).await?;
        self.view(&line).await
    }

    pub async fn update_line(&self, id: i32, cmd: UpdateLineCommand) -> DomainResult<LineView> {
        let _guard = self.locks.acquire(id).await;
        let mut line = self.load(id).await?;

        if let Some(name) = cmd.name.as_deref() {
            line.rename(name)?;
        }
        if let Some(color) = cmd.color.as_deref() {
            line.recolor(color)?;
        }

        let saved = self.repos.lines().save(line).await?;
        info!(line_id = id, name = saved.name(), color = saved.color(), "Line updated");
        self.view(&saved).await
    }

    /// Delete a line together with all of its sections.
    pub async fn delete_line(&self, id: i32) -> DomainResult<()> {
        let _guard = self.locks.acquire(id).await;
        self.repos.lines().delete_by_id(id).await?;
        info!(line_id = id, "Line deleted");
        Ok(())
    }

    /// Extend the line at its down terminus.
    pub async fn add_section(&self, line_id: i32, cmd: AddSectionCommand) -> DomainResult<LineView> {
        let _guard = self.locks.acquire(line_id).await;
        let mut line = self.load(line_id).await?;

        line.add_section(cmd.up_station_id, cmd.down_station_id, cmd.distance)?;
        let _attached = self.stations.attach().await;
        self.ensure_stations_exist(&[cmd.down_station_id]).await?;

        let saved = self.repos.lines().save(line).await?;
        metrics::counter!("sections_added_total").increment(1);
        info!(
            line_id,
            up = cmd.up_station_id,
            down = cmd.down_station_id,
            distance = cmd.distance,
            total = saved.distance(),
            "Section added"
        );

        self.view(&saved).await
    }

    /// Remove the tail section whose down station is `station_id`.
    pub async fn delete_section(&self, line_id: i32, station_id: i32) -> DomainResult<LineView> {
        let _guard = self.locks.acquire(line_id).await;
        let mut line = self.load(line_id).await?;

        let removed = line.delete_section(station_id)?;

        let saved = self.repos.lines().save(line).await?;
        metrics::counter!("sections_removed_total").increment(1);
        info!(
            line_id,
            station_id,
            distance = removed.distance,
            total = saved.distance(),
            "Section removed"
        );

        self.view(&saved).await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn load(&self, id: i32) -> DomainResult<Line> {
        self.repos
            .lines()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Line", id))
    }

    async fn station_map(&self, ids: &[i32]) -> DomainResult<HashMap<i32, Station>> {
        let stations = self.repos.stations().find_by_ids(ids).await?;
        Ok(stations.into_iter().map(|s| (s.id, s)).collect())
    }

    async fn ensure_stations_exist(&self, ids: &[i32]) -> DomainResult<()> {
        let found = self.station_map(ids).await?;
        match ids.iter().find(|id| !found.contains_key(id)) {
            Some(missing) => Err(DomainError::not_found("Station", *missing)),
            None => Ok(()),
        }
    }

    async fn view(&self, line: &Line) -> DomainResult<LineView> {
        let stations = self.station_map(&line.station_path()).await?;
        LineView::build(line, &stations).map_err(|missing| DomainError::not_found("Station", missing))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositoryProvider;

    struct Fixture {
        service: Arc<LineService>,
        repos: Arc<InMemoryRepositoryProvider>,
        guard: StationGuard,
        /// Gangnam, Yangjae, Pangyo, Jeongja, Migeum
        s: Vec<i32>,
    }

    async fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let mut s = Vec::new();
        for name in ["Gangnam", "Yangjae", "Pangyo", "Jeongja", "Migeum"] {
            let saved = repos
                .stations()
                .save(Station::new(name).unwrap())
                .await
                .unwrap();
            s.push(saved.id);
        }
        let guard = StationGuard::new();
        let service = Arc::new(LineService::new(repos.clone(), guard.clone()));
        Fixture {
            service,
            repos,
            guard,
            s,
        }
    }

    fn create_cmd(up: i32, down: i32, distance: i32) -> CreateLineCommand {
        CreateLineCommand {
            name: "Shinbundang".into(),
            color: "bg-red-600".into(),
            up_station_id: up,
            down_station_id: down,
            distance,
        }
    }

    fn section(up: i32, down: i32, distance: i32) -> AddSectionCommand {
        AddSectionCommand {
            up_station_id: up,
            down_station_id: down,
            distance,
        }
    }

    fn names(view: &LineView) -> Vec<&str> {
        view.stations.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn create_line_resolves_stations() {
        let f = fixture().await;
        let view = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        assert_eq!(view.name, "Shinbundang");
        assert_eq!(view.distance, 10);
        assert_eq!(view.up_station.name, "Gangnam");
        assert_eq!(view.down_station.name, "Yangjae");
        assert_eq!(names(&view), vec!["Gangnam", "Yangjae"]);
    }

    #[tokio::test]
    async fn create_line_with_unknown_station_persists_nothing() {
        let f = fixture().await;
        let err = f.service.create_line(create_cmd(f.s[0], 999, 10)).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { entity: "Station", .. }));
        assert!(f.repos.lines().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_line_rejects_invalid_input() {
        let f = fixture().await;
        let err = f.service.create_line(create_cmd(f.s[0], f.s[0], 10)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let err = f.service.create_line(create_cmd(f.s[0], f.s[1], 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn sections_extend_and_shrink_the_tail() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        f.service.add_section(line.id, section(f.s[1], f.s[2], 7)).await.unwrap();
        let view = f.service.add_section(line.id, section(f.s[2], f.s[3], 3)).await.unwrap();
        assert_eq!(names(&view), vec!["Gangnam", "Yangjae", "Pangyo", "Jeongja"]);
        assert_eq!(view.distance, 20);
        assert_eq!(view.down_station.name, "Jeongja");

        let view = f.service.delete_section(line.id, f.s[3]).await.unwrap();
        assert_eq!(names(&view), vec!["Gangnam", "Yangjae", "Pangyo"]);
        assert_eq!(view.distance, 17);

        let stored = f.service.find_line(line.id).await.unwrap();
        assert_eq!(stored.distance, 17);
        assert_eq!(stored.down_station.name, "Pangyo");
    }

    #[tokio::test]
    async fn rejected_section_leaves_line_unchanged() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        let err = f
            .service
            .add_section(line.id, section(f.s[0], f.s[2], 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SectionChainBroken { .. }));

        let err = f
            .service
            .add_section(line.id, section(f.s[1], 999, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station", .. }));

        let err = f.service.delete_section(line.id, f.s[1]).await.unwrap_err();
        assert_eq!(err, DomainError::CannotDeleteLastSection(line.id));

        let stored = f.service.find_line(line.id).await.unwrap();
        assert_eq!(stored.distance, 10);
        assert_eq!(names(&stored), vec!["Gangnam", "Yangjae"]);
    }

    #[tokio::test]
    async fn deleting_interior_station_is_not_found() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();
        f.service.add_section(line.id, section(f.s[1], f.s[2], 7)).await.unwrap();

        let err = f.service.delete_section(line.id, f.s[1]).await.unwrap_err();
        assert!(matches!(err, DomainError::SectionNotFound { .. }));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        let view = f
            .service
            .update_line(
                line.id,
                UpdateLineCommand {
                    name: None,
                    color: Some("bg-blue-600".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(view.name, "Shinbundang");
        assert_eq!(view.color, "bg-blue-600");

        let err = f
            .service
            .update_line(
                line.id,
                UpdateLineCommand {
                    name: Some(String::new()),
                    color: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(f.service.find_line(line.id).await.unwrap().name, "Shinbundang");
    }

    #[tokio::test]
    async fn unknown_line_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.service.find_line(42).await,
            Err(DomainError::NotFound { entity: "Line", .. })
        ));
        assert!(matches!(
            f.service.delete_line(42).await,
            Err(DomainError::NotFound { entity: "Line", .. })
        ));
        assert!(matches!(
            f.service.add_section(42, section(f.s[0], f.s[1], 1)).await,
            Err(DomainError::NotFound { entity: "Line", .. })
        ));
        assert!(matches!(
            f.service.delete_section(42, f.s[1]).await,
            Err(DomainError::NotFound { entity: "Line", .. })
        ));
        assert!(matches!(
            f.service.update_line(42, UpdateLineCommand::default()).await,
            Err(DomainError::NotFound { entity: "Line", .. })
        ));
        assert!(f.service.locks.is_empty());
    }

    #[tokio::test]
    async fn line_locks_do_not_outlive_requests() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        f.service.add_section(line.id, section(f.s[1], f.s[2], 7)).await.unwrap();
        f.service.add_section(line.id, section(f.s[0], f.s[3], 7)).await.unwrap_err();
        f.service.delete_line(line.id).await.unwrap();
        f.service.delete_line(line.id).await.unwrap_err();

        assert_eq!(f.service.locks.len(), 0);
    }

    #[tokio::test]
    async fn section_append_overflowing_distance_is_rejected() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(create_cmd(f.s[0], f.s[1], i32::MAX - 1))
            .await
            .unwrap();

        let err = f
            .service
            .add_section(line.id, section(f.s[1], f.s[2], 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let stored = f.service.find_line(line.id).await.unwrap();
        assert_eq!(stored.distance, i32::MAX - 1);
        assert_eq!(names(&stored), vec!["Gangnam", "Yangjae"]);
    }

    #[tokio::test]
    async fn append_waits_for_pending_station_delete() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        // A station delete is in progress for Pangyo.
        let detached = f.guard.detach().await;
        let line_id = line.id;
        let append = {
            let service = f.service.clone();
            let (up, down) = (f.s[1], f.s[2]);
            tokio::spawn(async move { service.add_section(line_id, section(up, down, 7)).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!append.is_finished());

        f.repos.stations().delete(f.s[2]).await.unwrap();
        drop(detached);

        let err = append.await.unwrap().unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station", .. }));
        let stored = f.service.find_line(line_id).await.unwrap();
        assert_eq!(names(&stored), vec!["Gangnam", "Yangjae"]);
    }

    #[tokio::test]
    async fn delete_line_removes_it() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();
        f.service.delete_line(line.id).await.unwrap();

        assert!(f.service.find_all_lines().await.unwrap().is_empty());
        assert!(!f.repos.lines().references_station(f.s[0]).await.unwrap());
    }

    #[tokio::test]
    async fn listing_skips_lines_with_vanished_stations() {
        let f = fixture().await;
        f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();
        let second = f.service.create_line(create_cmd(f.s[2], f.s[3], 4)).await.unwrap();

        f.repos.stations().delete(f.s[3]).await.unwrap();

        let all = f.service.find_all_lines().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].up_station.name, "Gangnam");
        assert!(matches!(
            f.service.find_line(second.id).await,
            Err(DomainError::NotFound { entity: "Station", .. })
        ));
    }

    #[tokio::test]
    async fn concurrent_appends_are_serialized() {
        let f = fixture().await;
        let line = f.service.create_line(create_cmd(f.s[0], f.s[1], 10)).await.unwrap();

        // Every task extends from Yangjae; only the first to run can succeed.
        let line_id = line.id;
        let mut handles = Vec::new();
        for down in [f.s[2], f.s[3], f.s[4]] {
            let service = f.service.clone();
            let up = f.s[1];
            handles.push(tokio::spawn(async move {
                service.add_section(line_id, section(up, down, 5)).await
            }));
        }

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(e) => assert!(matches!(e, DomainError::SectionChainBroken { .. })),
            }
        }
        assert_eq!(succeeded, 1);

        let stored = f.service.find_line(line_id).await.unwrap();
        assert_eq!(stored.stations.len(), 3);
        assert_eq!(stored.distance, 15);
    }
}
