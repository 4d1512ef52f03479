//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use crate::map_db_err;
use mediashare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use validator::Validate;

/// Input for creating a user.
///
/// The password field carries an already-hashed, opaque value; this
/// crate never hashes or verifies passwords.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    /// Unique login name.
    #[validate(length(min = 3, max = 128))]
    pub username: String,
    /// Opaque password hash.
    #[validate(length(min = 1, max = 256))]
    pub password: String,
    /// Unique email address.
    #[validate(email)]
    pub email: String,
    /// Permission level the user belongs to.
    pub level_id: i32,
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new user.
    ///
    /// Fails with [`AppError::Validation`] when the input is
    /// malformed and with [`AppError::ConstraintViolation`] when the
    /// username or email collides or the level does not exist.
    pub async fn create(&self, input: NewUser) -> AppResult<user::Model> {
        input.validate()?;

        let model = user::ActiveModel {
            username: Set(input.username),
            password: Set(input.password),
            email: Set(input.email),
            level_id: Set(input.level_id),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a user. Dependent rows cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Get users (paginated, newest first).
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        User::find()
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

    fn create_test_user(id: i32, username: &str, email: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            password: "$opaque$hash".to_string(),
            email: email.to_string(),
            level_id: 2,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user(1, "alice", "alice@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id(42).await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let user = create_test_user(1, "bob", "bob@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_username("bob").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo
            .create(NewUser {
                username: "carol".to_string(),
                password: "$opaque$hash".to_string(),
                email: "not-an-email".to_string(),
                level_id: 2,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_short_username() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo
            .create(NewUser {
                username: "ab".to_string(),
                password: "$opaque$hash".to_string(),
                email: "ab@example.com".to_string(),
                level_id: 2,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
