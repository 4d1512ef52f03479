//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::map_db_err;
use mediashare_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new comment.
    pub async fn create(
        &self,
        media_id: i32,
        user_id: i32,
        text: &str,
    ) -> AppResult<comment::Model> {
        let model = comment::ActiveModel {
            media_id: Set(media_id),
            user_id: Set(user_id),
            comment_text: Set(text.to_string()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Get comments on a media item (oldest first).
    pub async fn find_by_media(&self, media_id: i32) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::MediaId.eq(media_id))
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get comments written by a user (newest first).
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_desc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Count comments on a media item.
    pub async fn count_by_media(&self, media_id: i32) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::MediaId.eq(media_id))
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

    fn create_test_comment(id: i32, media_id: i32, user_id: i32, text: &str) -> comment::Model {
        comment::Model {
            id,
            media_id,
            user_id,
            comment_text: text.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_media() {
        let c1 = create_test_comment(1, 1, 2, "Nice shot!");
        let c2 = create_test_comment(2, 1, 3, "Where was this taken?");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_media(1).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].comment_text, "Nice shot!");
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_id(7).await.unwrap();

        assert!(result.is_none());
    }
}
