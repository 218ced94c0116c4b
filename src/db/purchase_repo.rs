use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{NewPurchase, Purchase};

/// Storage operations for purchases.
#[async_trait]
pub trait PurchaseRepo: Send + Sync {
    async fn create_purchase(&self, purchase: &NewPurchase) -> anyhow::Result<Purchase>;

    /// Remove a purchase. Only used to compensate a failed wager update.
    async fn delete_purchase(&self, id: i32) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct PgPurchaseRepo {
    pool: PgPool,
}

impl PgPurchaseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseRepo for PgPurchaseRepo {
    async fn create_purchase(&self, purchase: &NewPurchase) -> anyhow::Result<Purchase> {
        let created = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (wager_id, buying_price)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(purchase.wager_id)
        .bind(purchase.buying_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn delete_purchase(&self, id: i32) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
