use crate::m20250301_000001_create_farm_schema::{Crops, Fields, Operations};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============ CROPS TABLE INDEXES ============
        // Select options are always listed by name
        manager
            .create_index(
                Index::create()
                    .name("idx_crops_name")
                    .table(Crops::Table)
                    .col(Crops::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ============ FIELDS TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_fields_name")
                    .table(Fields::Table)
                    .col(Fields::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fields_crop")
                    .table(Fields::Table)
                    .col(Fields::Crop)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ============ OPERATIONS TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_operations_field_date")
                    .table(Operations::Table)
                    .col(Operations::Field)
                    .col(Operations::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_operations_field_date")
                    .table(Operations::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_fields_crop").table(Fields::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_fields_name").table(Fields::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_crops_name").table(Crops::Table).to_owned())
            .await?;

        Ok(())
    }
}
