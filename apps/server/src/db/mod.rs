//! Database module providing connection management, migrations, and queries.

pub mod documents;
pub mod orders;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{Config, DatabaseSettings};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

pub use documents::NewDocument;
pub use orders::NewOrder;

/// Database connection pool wrapper.
///
/// `DatabaseConnection` is internally pooled and cheap to clone.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Connect using explicit database settings.
    pub async fn connect(settings: &DatabaseSettings) -> AppResult<Self> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Check that the database answers.
    pub async fn ping(&self) -> AppResult<()> {
        self.conn.ping().await?;
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}
