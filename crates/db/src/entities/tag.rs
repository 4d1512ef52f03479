//! Tag entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The tag name (e.g., "Nature")
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::media_item_tag::Entity")]
    MediaLinks,
}

/// Many-to-many with media items through the associative table.
impl Related<super::media_item::Entity> for Entity {
    fn to() -> RelationDef {
        super::media_item_tag::Relation::MediaItem.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::media_item_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
