//! Media item entity (uploaded files).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owner user ID
    pub user_id: i32,

    /// Stored file name
    pub filename: String,

    /// File size in bytes, always positive
    pub filesize: i64,

    /// MIME type
    pub media_type: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::media_item_tag::Entity")]
    TagLinks,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

/// Many-to-many with tags through the associative table.
impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::media_item_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::media_item_tag::Relation::MediaItem.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
