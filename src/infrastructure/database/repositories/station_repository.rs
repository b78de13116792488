//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::station::{Station, StationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;

fn entity_to_domain(s: station::Model) -> Station {
    Station {
        id: s.id,
        name: s.name,
        created_at: s.created_at,
        updated_at: s.updated_at,
    }
}

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Station>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = station::Entity::find()
            .filter(station::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Station>> {
        let model = station::Entity::find()
            .filter(station::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, s: Station) -> DomainResult<Station> {
        let model = station::ActiveModel {
            id: NotSet,
            name: Set(s.name),
            created_at: Set(s.created_at),
            updated_at: Set(s.updated_at),
        };
        let result = model.insert(&self.db).await?;
        info!("Station saved: {} ({})", result.name, result.id);
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = station::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Station", id));
        }
        info!("Station deleted: {}", id);
        Ok(())
    }
}
