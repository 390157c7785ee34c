pub mod api;
pub mod client;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod github;

use std::time::Duration;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::config::Config;
use crate::error::AppError;

/// Open the connection pool and bring the schema up to date.
pub async fn connect_database(config: &Config) -> Result<Pool<Sqlite>, AppError> {
    let db = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    Ok(db)
}
