// src/main.rs
use std::sync::Arc;

use dotenvy::dotenv;
use shared_expense_tracker::{backend, config::Config, database};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = database::db::connection::get_db_pool(&config.database_url).await?;
    database::db::migrate::run_migrations(&pool).await?;

    backend::run_server(pool, config).await?;
    Ok(())
}
