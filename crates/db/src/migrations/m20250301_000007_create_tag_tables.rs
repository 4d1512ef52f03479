//! Create tag and media item tag tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tag::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tag::Name).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_tag_name")
                    .table(Tag::Table)
                    .col(Tag::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaItemTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MediaItemTag::MediaId).integer().not_null())
                    .col(ColumnDef::new(MediaItemTag::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(MediaItemTag::MediaId)
                            .col(MediaItemTag::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_item_tag_media_item")
                            .from(MediaItemTag::Table, MediaItemTag::MediaId)
                            .to(MediaItem::Table, MediaItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_item_tag_tag")
                            .from(MediaItemTag::Table, MediaItemTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: tag_id (for finding media items carrying a tag)
        manager
            .create_index(
                Index::create()
                    .name("idx_media_item_tag_tag_id")
                    .table(MediaItemTag::Table)
                    .col(MediaItemTag::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaItemTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum MediaItemTag {
    Table,
    MediaId,
    TagId,
}

#[derive(Iden)]
enum MediaItem {
    Table,
    Id,
}
