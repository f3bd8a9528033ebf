pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmReservationRepository;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./booking.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./booking.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut opts = ConnectOptions::new(config.url.clone());
    opts.acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    if config.is_in_memory() {
        // every pooled connection would otherwise get its own empty database
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(config.max_connections.max(1));
    }

    let db = Database::connect(opts).await?;
    info!("Database connected successfully");
    Ok(db)
}
