use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(Users::MustChangePassword)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assets::AssetId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Assets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Assets::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Assets::Category).string().not_null())
                    .col(
                        ColumnDef::new(Assets::BrandSpec)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Assets::PurchaseDate).string().null())
                    .col(
                        ColumnDef::new(Assets::ImagePath)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::Location)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::MaintenanceStatus)
                            .string()
                            .not_null()
                            .default("normal"),
                    )
                    .col(ColumnDef::new(Assets::CreatedBy).integer().null())
                    .col(ColumnDef::new(Assets::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Assets::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assets_created_by")
                            .from(Assets::Table, Assets::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetUsers::AssetId).integer().not_null())
                    .col(ColumnDef::new(AssetUsers::UserName).string().not_null())
                    .col(ColumnDef::new(AssetUsers::StartDate).string().not_null())
                    .col(ColumnDef::new(AssetUsers::EndDate).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_users_asset_id")
                            .from(AssetUsers::Table, AssetUsers::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RepairRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RepairRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RepairRecords::AssetId).integer().not_null())
                    .col(
                        ColumnDef::new(RepairRecords::RepairDate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RepairRecords::FaultCause)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RepairRecords::RepairResult)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(RepairRecords::CreatedBy).integer().null())
                    .col(
                        ColumnDef::new(RepairRecords::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repair_records_asset_id")
                            .from(RepairRecords::Table, RepairRecords::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repair_records_created_by")
                            .from(RepairRecords::Table, RepairRecords::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asset_users_asset_id")
                    .table(AssetUsers::Table)
                    .col(AssetUsers::AssetId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repair_records_asset_id")
                    .table(RepairRecords::Table)
                    .col(RepairRecords::AssetId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RepairRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssetUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    MustChangePassword,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
    AssetId,
    Name,
    Quantity,
    Category,
    BrandSpec,
    PurchaseDate,
    ImagePath,
    Location,
    Notes,
    MaintenanceStatus,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssetUsers {
    Table,
    Id,
    AssetId,
    UserName,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum RepairRecords {
    Table,
    Id,
    AssetId,
    RepairDate,
    FaultCause,
    RepairResult,
    CreatedBy,
    CreatedAt,
}
