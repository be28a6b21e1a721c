//! Seed the database with the three default users (admin/doctor/staff).
//!
//! Replaces any existing users, the same way the original development
//! seed did.

use anyhow::Result;
use hms_core::{config::Config, migration};
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hms_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    migration::ensure_database_exists(&config).await?;

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    migration::run_migrations(&pool).await?;
    migration::seed_default_users(&pool).await?;

    info!("Seeding complete");
    Ok(())
}
