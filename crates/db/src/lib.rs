//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The SWIFT code repository backing the registry
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::SwiftCodeRepository;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use swiftreg_shared::DatabaseConfig;

/// Establishes a connection to the database.
///
/// Makes up to `connect_attempts` tries, sleeping `connect_retry_delay_secs`
/// between them, and returns the last error if none succeeds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let attempts = config.connect_attempts.max(1);
    let mut attempt = 1;

    loop {
        match Database::connect(connect_options(config)).await {
            Ok(db) => {
                info!(attempt, "Connected to database");
                return Ok(db);
            }
            Err(err) if attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    error = %err,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(config.connect_retry_delay()).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    options
}
