//! User level repository.

use std::sync::Arc;

use crate::entities::{UserLevel, user_level};
use crate::map_db_err;
use mediashare_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// User level repository for database operations.
#[derive(Clone)]
pub struct UserLevelRepository {
    db: Arc<DatabaseConnection>,
}

impl UserLevelRepository {
    /// Create a new user level repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user level by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<user_level::Model>> {
        UserLevel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user level by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<user_level::Model>> {
        UserLevel::find()
            .filter(user_level::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new user level.
    pub async fn create(&self, name: &str) -> AppResult<user_level::Model> {
        let model = user_level::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Get all user levels.
    pub async fn find_all(&self) -> AppResult<Vec<user_level::Model>> {
        UserLevel::find()
            .order_by_asc(user_level::Column::Id)
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

    fn create_test_level(id: i32, name: &str) -> user_level::Model {
        user_level::Model {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_name_found() {
        let level = create_test_level(1, "Admin");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[level.clone()]])
                .into_connection(),
        );

        let repo = UserLevelRepository::new(db);
        let result = repo.find_by_name("Admin").await.unwrap();

        assert_eq!(result.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_find_all() {
        let levels = [
            create_test_level(1, "Admin"),
            create_test_level(2, "User"),
            create_test_level(3, "Guest"),
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([levels.to_vec()])
                .into_connection(),
        );

        let repo = UserLevelRepository::new(db);
        let result = repo.find_all().await.unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].name, "Admin");
    }
}
