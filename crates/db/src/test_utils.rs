//! Test database helpers for the integration tests.
//!
//! Integration tests run against a real `PostgreSQL` server; each
//! test creates a uniquely-named database so tests can run in
//! parallel and drop their database when they finish.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use tracing::info;

/// Tables emptied by [`TestDatabase::cleanup`]. The migrations table
/// is not listed so the schema stays installed.
const TABLES: [&str; 8] = [
    "media_item_tag",
    "rating",
    "like",
    "comment",
    "media_item",
    "tag",
    "user",
    "user_level",
];

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Connection settings for the test server.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: env_or("TEST_DB_HOST", "localhost"),
            port: env_or("TEST_DB_PORT", "5433").parse().unwrap_or(5433),
            username: env_or("TEST_DB_USER", "mediashare_test"),
            password: env_or("TEST_DB_PASSWORD", "mediashare_test"),
            database: env_or("TEST_DB_NAME", "mediashare_test"),
        }
    }
}

impl TestDbConfig {
    fn url(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }

    /// URL of the test database itself.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url(&self.database)
    }

    /// URL of the maintenance database used to create and drop test
    /// databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url("postgres")
    }
}

/// A connection to a test database, plus the settings needed to drop
/// it again.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect with the given settings.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Arc::new(Database::connect(&config.database_url()).await?);
        Ok(Self { conn, config })
    }

    /// Create a freshly-named database and connect to it.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("mediashare_test_{}", &suffix[..8]);

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %config.database, "Created test database");
        Self::with_config(config).await
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Get a cheaply-cloned handle to the database connection, for
    /// constructing repositories that take `Arc<DatabaseConnection>`.
    #[must_use]
    pub fn connection_arc(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Empty every table, keeping the schema in place.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let tables = TABLES
            .iter()
            .map(|table| format!("\"{table}\""))
            .collect::<Vec<_>>()
            .join(", ");

        self.conn
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("TRUNCATE TABLE {tables} RESTART IDENTITY CASCADE"),
            ))
            .await?;

        Ok(())
    }

    /// Drop the test database. Consumes self because the connection
    /// must be closed first.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        let Self { conn, config } = self;
        if let Ok(conn) = Arc::try_unwrap(conn) {
            conn.close().await?;
        }

        let admin = Database::connect(&config.postgres_url()).await?;

        // Kick out any straggling connections before dropping.
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!(
                    "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
                    config.database
                ),
            ))
            .await
            .ok();

        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %config.database, "Dropped test database");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TestDbConfig::default();
        assert_eq!(config.port, 5433);
        assert_eq!(config.database, "mediashare_test");
    }

    #[test]
    fn test_urls_differ_only_in_database() {
        let config = TestDbConfig {
            host: "dbhost".to_string(),
            port: 5433,
            username: "u".to_string(),
            password: "p".to_string(),
            database: "testdb".to_string(),
        };

        assert_eq!(config.database_url(), "postgres://u:p@dbhost:5433/testdb");
        assert_eq!(config.postgres_url(), "postgres://u:p@dbhost:5433/postgres");
    }
}
