//! Create lines table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lines::Name).string_len(20).not_null())
                    .col(ColumnDef::new(Lines::Color).string_len(20).not_null())
                    .col(ColumnDef::new(Lines::UpStationId).integer().not_null())
                    .col(ColumnDef::new(Lines::DownStationId).integer().not_null())
                    .col(ColumnDef::new(Lines::Distance).integer().not_null())
                    .col(
                        ColumnDef::new(Lines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lines_up_station")
                            .from(Lines::Table, Lines::UpStationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lines_down_station")
                            .from(Lines::Table, Lines::DownStationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lines::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Lines {
    Table,
    Id,
    Name,
    Color,
    UpStationId,
    DownStationId,
    Distance,
    CreatedAt,
    UpdatedAt,
}
