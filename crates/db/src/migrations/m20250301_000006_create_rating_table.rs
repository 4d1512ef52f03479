//! Create rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rating::MediaId).integer().not_null())
                    .col(ColumnDef::new(Rating::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Rating::Value)
                            .integer()
                            .not_null()
                            .check(Expr::col(Rating::Value).between(1, 5)),
                    )
                    .col(
                        ColumnDef::new(Rating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_media_item")
                            .from(Rating::Table, Rating::MediaId)
                            .to(MediaItem::Table, MediaItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: media_id (for aggregating ratings on a media item)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_media_id")
                    .table(Rating::Table)
                    .col(Rating::MediaId)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's ratings)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_user_id")
                    .table(Rating::Table)
                    .col(Rating::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rating {
    Table,
    Id,
    MediaId,
    UserId,
    Value,
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
