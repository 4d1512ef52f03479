//! Create like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Like::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Like::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Like::MediaId).integer().not_null())
                    .col(ColumnDef::new(Like::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Like::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_media_item")
                            .from(Like::Table, Like::MediaId)
                            .to(MediaItem::Table, MediaItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_user")
                            .from(Like::Table, Like::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, media_id) - one like per user per media item
        manager
            .create_index(
                Index::create()
                    .name("idx_like_user_media")
                    .table(Like::Table)
                    .col(Like::UserId)
                    .col(Like::MediaId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: media_id (for counting likes on a media item)
        manager
            .create_index(
                Index::create()
                    .name("idx_like_media_id")
                    .table(Like::Table)
                    .col(Like::MediaId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Like::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Like {
    Table,
    Id,
    MediaId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum MediaItem {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
