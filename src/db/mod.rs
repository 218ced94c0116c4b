pub mod memory;
pub mod purchase_repo;
pub mod wager_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub use memory::InMemoryStore;
pub use purchase_repo::{PgPurchaseRepo, PurchaseRepo};
pub use wager_repo::{PgWagerRepo, WagerRepo};

pub async fn init_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .connect(&config.url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}
