//! Database layer for mediashare-rs.

pub mod entities;
pub mod migrations;
pub mod queries;
pub mod repositories;
pub mod seed;
pub mod test_utils;

use mediashare_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Classify a database error.
///
/// Unique collisions, missing foreign keys, and check failures become
/// [`AppError::ConstraintViolation`]; everything else is reported as
/// [`AppError::Database`].
pub(crate) fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(
            SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg),
        ) => AppError::ConstraintViolation(msg),
        _ => {
            let msg = err.to_string();
            if msg.contains("check constraint") {
                AppError::ConstraintViolation(msg)
            } else {
                AppError::Database(msg)
            }
        }
    }
}
