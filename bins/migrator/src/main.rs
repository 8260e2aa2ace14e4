//! Database migration runner for the SWIFT code registry.
//!
//! Connects with the same configuration as the server (`config/*.toml` and
//! `SWIFTREG__DATABASE__URL`).
//!
//! Usage:
//!   migrator [up]    - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!   migrator refresh - Roll back everything, then re-apply

use anyhow::{Context, bail};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiftreg_db::{connect, migration::Migrator};
use swiftreg_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swiftreg=info,sea_orm_migration=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;

    match command.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, Some(1)).await?,
        "status" => Migrator::status(&db).await?,
        "fresh" => Migrator::fresh(&db).await?,
        "refresh" => Migrator::refresh(&db).await?,
        other => bail!("unknown command '{other}', expected up, down, status, fresh or refresh"),
    }

    info!(command = %command, "Migration command finished");
    Ok(())
}
