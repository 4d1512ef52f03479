//! Create media item table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaItem::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaItem::UserId).integer().not_null())
                    .col(ColumnDef::new(MediaItem::Filename).string_len(255).not_null())
                    .col(
                        ColumnDef::new(MediaItem::Filesize)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(MediaItem::Filesize).gt(0)),
                    )
                    .col(ColumnDef::new(MediaItem::MediaType).string_len(255).not_null())
                    .col(ColumnDef::new(MediaItem::Title).string_len(255).not_null())
                    .col(ColumnDef::new(MediaItem::Description).text())
                    .col(
                        ColumnDef::new(MediaItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_item_user")
                            .from(MediaItem::Table, MediaItem::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's uploads)
        manager
            .create_index(
                Index::create()
                    .name("idx_media_item_user_id")
                    .table(MediaItem::Table)
                    .col(MediaItem::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: media_type (for grouping and filtering by MIME type)
        manager
            .create_index(
                Index::create()
                    .name("idx_media_item_media_type")
                    .table(MediaItem::Table)
                    .col(MediaItem::MediaType)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_media_item_created_at")
                    .table(MediaItem::Table)
                    .col(MediaItem::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaItem::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MediaItem {
    Table,
    Id,
    UserId,
    Filename,
    Filesize,
    MediaType,
    Title,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
