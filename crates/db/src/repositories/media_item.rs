//! Media item repository.

use std::sync::Arc;

use crate::entities::{MediaItem, media_item};
use crate::map_db_err;
use mediashare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use validator::Validate;

/// Input for creating a media item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMediaItem {
    /// Owner user ID.
    pub user_id: i32,
    /// Stored file name.
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    /// File size in bytes. Must be positive; the table carries a
    /// check constraint for the same rule.
    #[validate(range(min = 1))]
    pub filesize: i64,
    /// MIME type (e.g., "image/jpeg").
    #[validate(length(min = 1, max = 255))]
    pub media_type: String,
    /// Display title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Media item repository for database operations.
#[derive(Clone)]
pub struct MediaItemRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaItemRepository {
    /// Create a new media item repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a media item by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<media_item::Model>> {
        MediaItem::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a media item by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<media_item::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))
    }

    /// Create a new media item.
    ///
    /// Fails with [`AppError::ConstraintViolation`] when the owner
    /// does not exist.
    pub async fn create(&self, input: NewMediaItem) -> AppResult<media_item::Model> {
        input.validate()?;

        let model = media_item::ActiveModel {
            user_id: Set(input.user_id),
            filename: Set(input.filename),
            filesize: Set(input.filesize),
            media_type: Set(input.media_type),
            title: Set(input.title),
            description: Set(input.description),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a media item. Dependent rows cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let item = self.find_by_id(id).await?;
        if let Some(m) = item {
            m.delete(self.db.as_ref()).await.map_err(map_db_err)?;
        }
        Ok(())
    }

    /// Get media items owned by a user (newest first).
    pub async fn find_by_owner(&self, user_id: i32) -> AppResult<Vec<media_item::Model>> {
        MediaItem::find()
            .filter(media_item::Column::UserId.eq(user_id))
            .order_by_desc(media_item::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get media items (paginated, newest first).
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<media_item::Model>> {
        MediaItem::find()
            .order_by_desc(media_item::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Count all media items.
    pub async fn count(&self) -> AppResult<u64> {
        MediaItem::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_media(id: i32, user_id: i32, media_type: &str) -> media_item::Model {
        media_item::Model {
            id,
            user_id,
            filename: format!("file{id}.jpg"),
            filesize: 1024,
            media_type: media_type.to_string(),
            title: format!("Media {id}"),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let item = create_test_media(1, 1, "image/jpeg");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[item.clone()]])
                .into_connection(),
        );

        let repo = MediaItemRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<media_item::Model>::new()])
                .into_connection(),
        );

        let repo = MediaItemRepository::new(db);
        let result = repo.get_by_id(9).await;

        assert!(matches!(result, Err(AppError::MediaNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_owner() {
        let m1 = create_test_media(2, 1, "image/png");
        let m2 = create_test_media(1, 1, "image/jpeg");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1, m2]])
                .into_connection(),
        );

        let repo = MediaItemRepository::new(db);
        let result = repo.find_by_owner(1).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_zero_filesize() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = MediaItemRepository::new(db);
        let result = repo
            .create(NewMediaItem {
                user_id: 1,
                filename: "empty.bin".to_string(),
                filesize: 0,
                media_type: "application/octet-stream".to_string(),
                title: "Empty".to_string(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
