//! Tag repository.

use std::sync::Arc;

use crate::entities::{MediaItemTag, Tag, media_item_tag, tag};
use crate::map_db_err;
use mediashare_common::AppResult;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tag by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new tag.
    pub async fn create(&self, name: &str) -> AppResult<tag::Model> {
        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Get or create a tag.
    pub async fn get_or_create(&self, name: &str) -> AppResult<tag::Model> {
        if let Some(tag) = self.find_by_name(name).await? {
            return Ok(tag);
        }

        self.create(name).await
    }

    /// Get all tags.
    pub async fn find_all(&self) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Attach a tag to a media item.
    ///
    /// Fails with [`mediashare_common::AppError::ConstraintViolation`]
    /// when either side of the link does not exist, or when the link
    /// is already present.
    pub async fn attach(&self, media_id: i32, tag_id: i32) -> AppResult<media_item_tag::Model> {
        let model = media_item_tag::ActiveModel {
            media_id: Set(media_id),
            tag_id: Set(tag_id),
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Detach a tag from a media item.
    pub async fn detach(&self, media_id: i32, tag_id: i32) -> AppResult<()> {
        MediaItemTag::delete_by_id((media_id, tag_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Get the tags attached to a media item.
    pub async fn find_tags_for_media(&self, media_id: i32) -> AppResult<Vec<tag::Model>> {
        let tag_ids = Query::select()
            .column(media_item_tag::Column::TagId)
            .from(MediaItemTag)
            .and_where(media_item_tag::Column::MediaId.eq(media_id))
            .to_owned();

        Tag::find()
            .filter(tag::Column::Id.in_subquery(tag_ids))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_tag(id: i32, name: &str) -> tag::Model {
        tag::Model {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_name_found() {
        let tag = create_test_tag(1, "Nature");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag.clone()]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_by_name("Nature").await.unwrap();

        assert_eq!(result.unwrap().name, "Nature");
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let tag = create_test_tag(1, "Nature");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag.clone()]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.get_or_create("Nature").await.unwrap();

        assert_eq!(result.id, 1);
    }

    #[tokio::test]
    async fn test_find_tags_for_media() {
        let t1 = create_test_tag(1, "Nature");
        let t2 = create_test_tag(2, "Travel");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1, t2]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_tags_for_media(1).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
