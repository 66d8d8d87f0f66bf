use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::time::Duration;

use crate::config::Config;

/// Initialize the database connection from config.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, sea_orm::DbErr> {
    // With sqlite::memory: every pooled connection gets its own database,
    // so the pool must be pinned to a single connection.
    let max_connections = if config.database_url.starts_with("sqlite") {
        1
    } else {
        100
    };

    let mut opts = ConnectOptions::new(&config.database_url);
    opts.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(config.is_dev());

    SeaDatabase::connect(opts).await
}
