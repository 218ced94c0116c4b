use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::models::{NewPurchase, NewWager, Purchase, Wager};

use super::{PurchaseRepo, WagerRepo};

/// Repository operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CreateWager,
    ListWagers,
    GetWager,
    UpdateWager,
    CreatePurchase,
    DeletePurchase,
}

/// In-memory implementation of both repositories, used by tests.
///
/// Faults are sticky: once set, every call to that operation fails with the
/// given message until [`InMemoryStore::clear_faults`] is called.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    wagers: BTreeMap<i32, Wager>,
    purchases: BTreeMap<i32, Purchase>,
    last_wager_id: i32,
    last_purchase_id: i32,
    faults: HashMap<StoreOp, String>,
    /// Applied after a wager snapshot is taken, widening the race window.
    read_delay: Option<Duration>,
    delete_delay: Option<Duration>,
}

impl StoreInner {
    fn check(&self, op: StoreOp) -> anyhow::Result<()> {
        match self.faults.get(&op) {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail(&self, op: StoreOp, message: impl Into<String>) {
        self.inner.lock().await.faults.insert(op, message.into());
    }

    pub async fn clear_faults(&self) {
        self.inner.lock().await.faults.clear();
    }

    pub async fn set_read_delay(&self, delay: Duration) {
        self.inner.lock().await.read_delay = Some(delay);
    }

    pub async fn set_delete_delay(&self, delay: Duration) {
        self.inner.lock().await.delete_delay = Some(delay);
    }

    /// Seed a wager with a fixed id.
    pub async fn insert_wager(&self, wager: Wager) {
        let mut inner = self.inner.lock().await;
        inner.last_wager_id = inner.last_wager_id.max(wager.id);
        inner.wagers.insert(wager.id, wager);
    }

    pub async fn wager(&self, id: i32) -> Option<Wager> {
        self.inner.lock().await.wagers.get(&id).cloned()
    }

    pub async fn purchases(&self) -> Vec<Purchase> {
        self.inner.lock().await.purchases.values().cloned().collect()
    }
}

#[async_trait]
impl WagerRepo for InMemoryStore {
    async fn create_wager(&self, wager: &NewWager) -> anyhow::Result<Wager> {
        let mut inner = self.inner.lock().await;
        inner.check(StoreOp::CreateWager)?;

        inner.last_wager_id += 1;
        let created = Wager {
            id: inner.last_wager_id,
            total_wager_value: wager.total_wager_value,
            odds: wager.odds,
            selling_percentage: wager.selling_percentage,
            selling_price: wager.selling_price,
            current_selling_price: wager.current_selling_price,
            percentage_sold: Some(wager.percentage_sold),
            amount_sold: Some(wager.amount_sold),
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        inner.wagers.insert(created.id, created.clone());

        Ok(created)
    }

    async fn list_wagers(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<Wager>> {
        let inner = self.inner.lock().await;
        inner.check(StoreOp::ListWagers)?;

        Ok(inner
            .wagers
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_wager_by_id(&self, id: i32) -> anyhow::Result<Option<Wager>> {
        let (snapshot, delay) = {
            let inner = self.inner.lock().await;
            inner.check(StoreOp::GetWager)?;
            (inner.wagers.get(&id).cloned(), inner.read_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(snapshot)
    }

    async fn update_wager(&self, wager: &Wager) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().await;
        inner.check(StoreOp::UpdateWager)?;

        let stored = inner
            .wagers
            .get_mut(&wager.id)
            .ok_or_else(|| anyhow::anyhow!("wager {} not found for update", wager.id))?;
        stored.current_selling_price = wager.current_selling_price;
        stored.percentage_sold = wager.percentage_sold;
        stored.amount_sold = wager.amount_sold;
        stored.updated_at = Some(Utc::now());

        Ok(())
    }
}

#[async_trait]
impl PurchaseRepo for InMemoryStore {
    async fn create_purchase(&self, purchase: &NewPurchase) -> anyhow::Result<Purchase> {
        let mut inner = self.inner.lock().await;
        inner.check(StoreOp::CreatePurchase)?;

        inner.last_purchase_id += 1;
        let created = Purchase {
            id: inner.last_purchase_id,
            wager_id: purchase.wager_id,
            buying_price: purchase.buying_price,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        inner.purchases.insert(created.id, created.clone());

        Ok(created)
    }

    async fn delete_purchase(&self, id: i32) -> anyhow::Result<()> {
        let delay = {
            let inner = self.inner.lock().await;
            inner.check(StoreOp::DeletePurchase)?;
            inner.delete_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.inner.lock().await.purchases.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_wager(total: i64) -> NewWager {
        NewWager {
            total_wager_value: total,
            odds: 2,
            selling_percentage: 20.0,
            selling_price: 21.0,
            current_selling_price: 21.0,
            percentage_sold: 0.0,
            amount_sold: 0,
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_paging() {
        let store = InMemoryStore::new();
        for total in 1..=5 {
            store.create_wager(&new_wager(total * 100)).await.unwrap();
        }

        let page: Vec<i32> = store
            .list_wagers(1, 2)
            .await
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(page, vec![4, 3]);
    }

    #[tokio::test]
    async fn test_ids_continue_after_seeded_wager() {
        let store = InMemoryStore::new();
        let mut seeded = store.create_wager(&new_wager(100)).await.unwrap();
        seeded.id = 111;
        store.insert_wager(seeded).await;

        let next = store.create_wager(&new_wager(100)).await.unwrap();
        assert_eq!(next.id, 112);
    }

    #[tokio::test]
    async fn test_update_missing_wager_fails() {
        let store = InMemoryStore::new();
        let mut wager = store.create_wager(&new_wager(100)).await.unwrap();
        wager.id = 999;

        assert!(store.update_wager(&wager).await.is_err());
    }

    #[tokio::test]
    async fn test_faults_are_sticky_until_cleared() {
        let store = InMemoryStore::new();
        store.fail(StoreOp::GetWager, "boom").await;

        let err = store.get_wager_by_id(1).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(store.get_wager_by_id(1).await.is_err());

        store.clear_faults().await;
        assert!(store.get_wager_by_id(1).await.unwrap().is_none());
    }
}
