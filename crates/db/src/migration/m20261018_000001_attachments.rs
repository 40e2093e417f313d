//! Attachments table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attachments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attachments::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Attachments::OriginalName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attachments::StoragePath)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attachments::MimeType).string_len(255).not_null())
                    .col(ColumnDef::new(Attachments::Size).big_integer().not_null())
                    .col(ColumnDef::new(Attachments::OwnerId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Attachments::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Attachments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Storage paths are never shared or reused
        manager
            .create_index(
                Index::create()
                    .name("idx_attachments_storage_path")
                    .table(Attachments::Table)
                    .col(Attachments::StoragePath)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attachments_owner_id")
                    .table(Attachments::Table)
                    .col(Attachments::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attachments::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Attachments {
    Table,
    Id,
    OriginalName,
    StoragePath,
    MimeType,
    Size,
    OwnerId,
    IsPublic,
    CreatedAt,
}
