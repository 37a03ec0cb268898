use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Crops are referenced by fields, so they go first
        manager
            .create_table(
                Table::create()
                    .table(Crops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Crops::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Crops::Name).string().not_null())
                    .col(ColumnDef::new(Crops::Sowing).string())
                    .col(ColumnDef::new(Crops::TargetYield).double().not_null())
                    .col(ColumnDef::new(Crops::Value).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Fields::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fields::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fields::Name).string().not_null())
                    .col(ColumnDef::new(Fields::Area).double().not_null())
                    .col(ColumnDef::new(Fields::SoilType).string().not_null())
                    .col(ColumnDef::new(Fields::Risk).string().not_null())
                    .col(ColumnDef::new(Fields::Irrigation).string().not_null())
                    .col(ColumnDef::new(Fields::Drainage).string().not_null())
                    .col(ColumnDef::new(Fields::Ph).double().not_null())
                    .col(ColumnDef::new(Fields::Som).double().not_null())
                    .col(ColumnDef::new(Fields::SowingDate).date())
                    .col(ColumnDef::new(Fields::Notes).text())
                    .col(ColumnDef::new(Fields::Created).string().not_null())
                    .col(ColumnDef::new(Fields::Crop).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fields_crop")
                            .from(Fields::Table, Fields::Crop)
                            .to(Crops::Table, Crops::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Operations are removed by the application before their field, so the
        // foreign key itself does not cascade
        manager
            .create_table(
                Table::create()
                    .table(Operations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operations::Date).date().not_null())
                    .col(ColumnDef::new(Operations::Operation).string().not_null())
                    .col(ColumnDef::new(Operations::Detail).string())
                    .col(ColumnDef::new(Operations::Rate).string())
                    .col(ColumnDef::new(Operations::Field).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operations_field")
                            .from(Operations::Table, Operations::Field)
                            .to(Fields::Table, Fields::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Operations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fields::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Crops::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Crops {
    Table,
    Id,
    Name,
    Sowing,
    TargetYield,
    Value,
}

#[derive(DeriveIden)]
pub(crate) enum Fields {
    Table,
    Id,
    Name,
    Area,
    SoilType,
    Risk,
    Irrigation,
    Drainage,
    Ph,
    Som,
    SowingDate,
    Notes,
    Created,
    Crop,
}

#[derive(DeriveIden)]
pub(crate) enum Operations {
    Table,
    Id,
    Date,
    Operation,
    Detail,
    Rate,
    Field,
}
