use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{NewWager, Wager};

/// Storage operations for wagers.
#[async_trait]
pub trait WagerRepo: Send + Sync {
    /// Insert a wager; storage assigns `id` and `created_at`.
    async fn create_wager(&self, wager: &NewWager) -> anyhow::Result<Wager>;

    /// Page through wagers, newest id first.
    async fn list_wagers(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<Wager>>;

    /// `Ok(None)` when no wager has this id.
    async fn get_wager_by_id(&self, id: i32) -> anyhow::Result<Option<Wager>>;

    /// Persist the mutable aggregate (`current_selling_price`,
    /// `percentage_sold`, `amount_sold`) and stamp `updated_at`.
    async fn update_wager(&self, wager: &Wager) -> anyhow::Result<()>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PgWagerRepo {
    pool: PgPool,
}

impl PgWagerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WagerRepo for PgWagerRepo {
    async fn create_wager(&self, wager: &NewWager) -> anyhow::Result<Wager> {
        let created = sqlx::query_as::<_, Wager>(
            r#"
            INSERT INTO wagers (
                total_wager_value, odds, selling_percentage, selling_price,
                current_selling_price, percentage_sold, amount_sold
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(wager.total_wager_value)
        .bind(wager.odds)
        .bind(wager.selling_percentage)
        .bind(wager.selling_price)
        .bind(wager.current_selling_price)
        .bind(wager.percentage_sold)
        .bind(wager.amount_sold)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_wagers(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<Wager>> {
        let wagers = sqlx::query_as::<_, Wager>(
            "SELECT * FROM wagers ORDER BY id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(wagers)
    }

    async fn get_wager_by_id(&self, id: i32) -> anyhow::Result<Option<Wager>> {
        let wager = sqlx::query_as::<_, Wager>("SELECT * FROM wagers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(wager)
    }

    async fn update_wager(&self, wager: &Wager) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE wagers
            SET current_selling_price = $2,
                percentage_sold = $3,
                amount_sold = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wager.id)
        .bind(wager.current_selling_price)
        .bind(wager.percentage_sold)
        .bind(wager.amount_sold)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("wager {} not found for update", wager.id);
        }

        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
