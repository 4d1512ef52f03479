//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use crate::map_db_err;
use mediashare_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and media item.
    pub async fn find_by_user_and_media(
        &self,
        user_id: i32,
        media_id: i32,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::MediaId.eq(media_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check if a user has liked a media item.
    pub async fn has_liked(&self, user_id: i32, media_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_media(user_id, media_id)
            .await?
            .is_some())
    }

    /// Create a new like.
    ///
    /// A second like from the same user on the same media item fails
    /// with [`mediashare_common::AppError::ConstraintViolation`].
    pub async fn create(&self, media_id: i32, user_id: i32) -> AppResult<like::Model> {
        let model = like::ActiveModel {
            media_id: Set(media_id),
            user_id: Set(user_id),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a like by user and media item.
    pub async fn delete_by_user_and_media(&self, user_id: i32, media_id: i32) -> AppResult<()> {
        let like = self.find_by_user_and_media(user_id, media_id).await?;
        if let Some(l) = like {
            l.delete(self.db.as_ref()).await.map_err(map_db_err)?;
        }
        Ok(())
    }

    /// Count likes on a media item.
    pub async fn count_by_media(&self, media_id: i32) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::MediaId.eq(media_id))
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

    fn create_test_like(id: i32, media_id: i32, user_id: i32) -> like::Model {
        like::Model {
            id,
            media_id,
            user_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let like = create_test_like(1, 2, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like.clone()]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.has_liked(1, 2).await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.has_liked(1, 3).await.unwrap();

        assert!(!result);
    }
}
