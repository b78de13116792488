//! Create sections table
//!
//! No ON DELETE CASCADE: the line repository removes sections and their
//! line explicitly inside one transaction.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_stations::Stations;
use super::m20240101_000002_create_lines::Lines;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sections::LineId).integer().not_null())
                    .col(ColumnDef::new(Sections::Seq).integer().not_null())
                    .col(ColumnDef::new(Sections::UpStationId).integer().not_null())
                    .col(ColumnDef::new(Sections::DownStationId).integer().not_null())
                    .col(ColumnDef::new(Sections::Distance).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_sections")
                            .col(Sections::LineId)
                            .col(Sections::Seq),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sections_line")
                            .from(Sections::Table, Sections::LineId)
                            .to(Lines::Table, Lines::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sections_up_station")
                            .from(Sections::Table, Sections::UpStationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sections_down_station")
                            .from(Sections::Table, Sections::DownStationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sections_down_station")
                    .table(Sections::Table)
                    .col(Sections::LineId)
                    .col(Sections::DownStationId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Sections {
    Table,
    LineId,
    Seq,
    UpStationId,
    DownStationId,
    Distance,
}
