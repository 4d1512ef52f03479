//! Rating repository.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use crate::map_db_err;
use mediashare_common::AppResult;
use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a rating by user and media item.
    pub async fn find_by_user_and_media(
        &self,
        user_id: i32,
        media_id: i32,
    ) -> AppResult<Option<rating::Model>> {
        Rating::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::MediaId.eq(media_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new rating.
    ///
    /// The value range [1,5] is enforced by the table's check
    /// constraint; out-of-range values fail with
    /// [`mediashare_common::AppError::ConstraintViolation`].
    pub async fn create(&self, media_id: i32, user_id: i32, value: i32) -> AppResult<rating::Model> {
        let model = rating::ActiveModel {
            media_id: Set(media_id),
            user_id: Set(user_id),
            value: Set(value),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Count ratings on a media item.
    pub async fn count_by_media(&self, media_id: i32) -> AppResult<u64> {
        Rating::find()
            .filter(rating::Column::MediaId.eq(media_id))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Average rating for a media item, or `None` when unrated.
    pub async fn average_for_media(&self, media_id: i32) -> AppResult<Option<f64>> {
        let avg: Option<Option<f64>> = Rating::find()
            .select_only()
            .column_as(
                Expr::expr(Func::avg(Expr::col(rating::Column::Value)))
                    .cast_as(Alias::new("double precision")),
                "avg_value",
            )
            .filter(rating::Column::MediaId.eq(media_id))
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(avg.flatten())
    }
}
