//! SeaORM implementation of LineRepository
//!
//! A line row and its section rows are always written inside one database
//! transaction, so a reader never sees termini that disagree with the
//! stored chain.

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::line::{Line, LineRepository, Section};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{line, section};

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(l: line::Model, mut rows: Vec<section::Model>) -> DomainResult<Line> {
    rows.sort_by_key(|s| s.seq);
    let sections = rows
        .into_iter()
        .map(|s| Section {
            id: s.seq,
            up_station_id: s.up_station_id,
            down_station_id: s.down_station_id,
            distance: s.distance,
        })
        .collect();
    Line::restore(l.id, l.name, l.color, sections, l.created_at, l.updated_at)
}

fn section_rows(line_id: i32, line: &Line) -> Vec<section::ActiveModel> {
    line.sections()
        .iter()
        .map(|s| section::ActiveModel {
            line_id: Set(line_id),
            seq: Set(s.id),
            up_station_id: Set(s.up_station_id),
            down_station_id: Set(s.down_station_id),
            distance: Set(s.distance),
        })
        .collect()
}

// ── SeaOrmLineRepository ────────────────────────────────────────

pub struct SeaOrmLineRepository {
    db: DatabaseConnection,
}

impl SeaOrmLineRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LineRepository for SeaOrmLineRepository {
    async fn save(&self, l: Line) -> DomainResult<Line> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let line_id = if l.is_persisted() {
            let existing = line::Entity::find_by_id(l.id()).one(&txn).await?;
            let Some(existing) = existing else {
                return Err(DomainError::not_found("Line", l.id()));
            };

            let model = line::ActiveModel {
                id: Set(l.id()),
                name: Set(l.name().to_string()),
                color: Set(l.color().to_string()),
                up_station_id: Set(l.up_station_id()),
                down_station_id: Set(l.down_station_id()),
                distance: Set(l.distance()),
                created_at: Set(existing.created_at),
                updated_at: Set(now),
            };
            model.update(&txn).await?;

            section::Entity::delete_many()
                .filter(section::Column::LineId.eq(l.id()))
                .exec(&txn)
                .await?;
            l.id()
        } else {
            let model = line::ActiveModel {
                id: NotSet,
                name: Set(l.name().to_string()),
                color: Set(l.color().to_string()),
                up_station_id: Set(l.up_station_id()),
                down_station_id: Set(l.down_station_id()),
                distance: Set(l.distance()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(&txn).await?.id
        };

        section::Entity::insert_many(section_rows(line_id, &l))
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        info!(
            "Line saved: {} ({}) with {} sections, distance {}",
            l.name(),
            line_id,
            l.sections().len(),
            l.distance()
        );

        self.find_by_id(line_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Line", line_id))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Line>> {
        let found = line::Entity::find_by_id(id)
            .find_with_related(section::Entity)
            .all(&self.db)
            .await?;

        found
            .into_iter()
            .next()
            .map(|(l, rows)| entity_to_domain(l, rows))
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Line>> {
        let found = line::Entity::find()
            .find_with_related(section::Entity)
            .order_by_asc(line::Column::Id)
            .all(&self.db)
            .await?;

        found
            .into_iter()
            .map(|(l, rows)| entity_to_domain(l, rows))
            .collect()
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        section::Entity::delete_many()
            .filter(section::Column::LineId.eq(id))
            .exec(&txn)
            .await?;
        let result = line::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            // dropping the transaction rolls it back
            return Err(DomainError::not_found("Line", id));
        }

        txn.commit().await?;
        info!("Line deleted: {}", id);
        Ok(())
    }

    async fn references_station(&self, station_id: i32) -> DomainResult<bool> {
        let count = section::Entity::find()
            .filter(
                Condition::any()
                    .add(section::Column::UpStationId.eq(station_id))
                    .add(section::Column::DownStationId.eq(station_id)),
            )
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

// ── Tests ──────────────────────────────────────────────────────
