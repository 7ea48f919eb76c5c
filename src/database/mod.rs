//! Database access layer with domain-specific DAOs
//!
//! Each table has its own DAO; the manager hands out DAOs that share one
//! connection pool and owns migrations and the connectivity health check.

use crate::config::Config;
use crate::health::HealthChecker;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use dao::{DaysToHireSample, JobPostingsDao, StatisticsDao};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get job postings DAO
    fn job_postings(&self) -> JobPostingsDao;

    /// Get statistics DAO
    fn statistics(&self) -> StatisticsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &Config) -> Result<Self, DatabaseError> {
        ensure_sqlite_parent_dir(&config.database.url)?;

        // Every pooled connection to `:memory:` would otherwise see its own empty database
        let max_connections = if config.database.url.contains(":memory:") {
            1
        } else {
            config.database.max_connections
        };

        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(max_connections)
            .sqlx_logging(false);

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Self { connection })
    }
}

/// SQLite refuses to create a database file inside a missing directory
fn ensure_sqlite_parent_dir(url: &str) -> DatabaseResult<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Database(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn job_postings(&self) -> JobPostingsDao {
        JobPostingsDao::new(self.connection.clone())
    }

    fn statistics(&self) -> StatisticsDao {
        StatisticsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> crate::health::HealthCheckResult {
        match self.health_check().await {
            Ok(_) => crate::health::HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok",
                "backend": format!("{:?}", self.connection.get_database_backend()),
            })),
            Err(err) => {
                crate::health::HealthCheckResult::unhealthy(format!("DB health check failed: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_database() -> DatabaseManagerImpl {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        let database = DatabaseManagerImpl::new_from_config(&config).await.unwrap();
        database.migrate().await.unwrap();
        database
    }

    #[tokio::test]
    async fn test_migrate_and_health_check() {
        let database = memory_database().await;
        assert!(database.health_check().await.is_ok());

        // Migrations are idempotent
        assert!(database.migrate().await.is_ok());
    }

    #[tokio::test]
    async fn test_database_health_checker() {
        let database = memory_database().await;
        let result = database.check().await;
        assert!(matches!(
            result.status,
            crate::health::HealthStatus::Healthy
        ));
        assert_eq!(database.name(), "database");
    }

    #[test]
    fn test_sqlite_dir_skips_memory_and_other_backends() {
        assert!(ensure_sqlite_parent_dir("sqlite::memory:").is_ok());
        assert!(ensure_sqlite_parent_dir("postgres://localhost/stats").is_ok());
    }

    #[test]
    fn test_sqlite_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("stats.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        ensure_sqlite_parent_dir(&url).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
