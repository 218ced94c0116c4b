use std::sync::Arc;

use metrics::counter;

use crate::db::WagerRepo;
use crate::errors::AppError;
use crate::models::{ListWagersRequest, PlaceWagerRequest, WagerView};

use super::transform::to_new_wager;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Placement and listing of wagers.
#[derive(Clone)]
pub struct WagerCatalog {
    wagers: Arc<dyn WagerRepo>,
}

impl WagerCatalog {
    pub fn new(wagers: Arc<dyn WagerRepo>) -> Self {
        Self { wagers }
    }

    /// Validate and persist a new wager. Storage errors are returned as-is.
    pub async fn place(&self, req: &PlaceWagerRequest) -> Result<WagerView, AppError> {
        validate_place_request(req)?;

        let wager = self.wagers.create_wager(&to_new_wager(req)).await?;

        counter!("wagers_placed_total").increment(1);
        tracing::info!(
            wager_id = wager.id,
            total_wager_value = wager.total_wager_value,
            selling_price = wager.selling_price,
            "Wager placed"
        );

        Ok(wager.into())
    }

    /// One page of wagers, newest first.
    pub async fn list(&self, req: &ListWagersRequest) -> Result<Vec<WagerView>, AppError> {
        let (offset, limit) = page_window(req);
        let wagers = self.wagers.list_wagers(offset, limit).await?;

        Ok(wagers.into_iter().map(WagerView::from).collect())
    }
}

/// Checks run in order; the first failure is reported.
pub fn validate_place_request(req: &PlaceWagerRequest) -> Result<(), AppError> {
    if req.total_wager_value < 1 {
        return Err(AppError::InvalidTotalWagerValue);
    }

    if req.odds < 1 {
        return Err(AppError::InvalidOdds);
    }

    if !(1.0..=100.0).contains(&req.selling_percentage) {
        return Err(AppError::InvalidSellingPercentage);
    }

    let proportional_value = f64::from(req.total_wager_value) * req.selling_percentage / 100.0;
    if req.selling_price <= proportional_value {
        return Err(AppError::InvalidSellingPrice);
    }

    Ok(())
}

/// Translate page/limit into `(offset, limit)`. Zero means "use the default".
///
/// The offset saturates at `i64::MAX`, which simply lands past the last row.
pub fn page_window(req: &ListWagersRequest) -> (i64, i64) {
    let limit = if req.limit == 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        req.limit
    };
    let offset = match req.page.checked_sub(1) {
        Some(skipped) => i64::from(skipped).saturating_mul(i64::from(limit)),
        None => 0,
    };

    (offset, i64::from(limit))
}

#[cfg(test)]
mod tests {
    use crate::db::memory::{InMemoryStore, StoreOp};
    use crate::db::WagerRepo;
    use crate::errors::ErrorCode;
    use crate::models::Wager;

    use super::*;

    fn valid_request() -> PlaceWagerRequest {
        PlaceWagerRequest {
            total_wager_value: 1000,
            odds: 2,
            selling_percentage: 20.0,
            selling_price: 201.0,
        }
    }

    fn seeded_wager(id: i32) -> Wager {
        Wager {
            id,
            total_wager_value: 100,
            odds: 2,
            selling_percentage: 20.0,
            selling_price: 21.0,
            current_selling_price: 21.0,
            percentage_sold: None,
            amount_sold: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn catalog(store: &InMemoryStore) -> WagerCatalog {
        WagerCatalog::new(Arc::new(store.clone()))
    }

    #[test]
    fn test_validation_order_first_failure_wins() {
        let cases = [
            (
                PlaceWagerRequest {
                    total_wager_value: 0,
                    odds: 0,
                    selling_percentage: 0.0,
                    selling_price: 0.0,
                },
                ErrorCode::InvalidTotalWagerValue,
            ),
            (
                PlaceWagerRequest {
                    odds: 0,
                    selling_percentage: 101.0,
                    ..valid_request()
                },
                ErrorCode::InvalidOdds,
            ),
            (
                PlaceWagerRequest {
                    selling_percentage: 101.0,
                    selling_price: 1.0,
                    ..valid_request()
                },
                ErrorCode::InvalidSellingPercentage,
            ),
            (
                PlaceWagerRequest {
                    selling_percentage: 0.5,
                    ..valid_request()
                },
                ErrorCode::InvalidSellingPercentage,
            ),
            (
                PlaceWagerRequest {
                    selling_price: 100.0,
                    ..valid_request()
                },
                ErrorCode::InvalidSellingPrice,
            ),
        ];

        for (req, expected) in cases {
            let err = validate_place_request(&req).unwrap_err();
            assert_eq!(err.code(), expected, "{req:?}");
        }
    }

    #[test]
    fn test_selling_price_boundary() {
        // 1000 * 20% = 200: equal is rejected, anything above passes.
        let at_face = PlaceWagerRequest {
            selling_price: 200.0,
            ..valid_request()
        };
        assert!(matches!(
            validate_place_request(&at_face),
            Err(AppError::InvalidSellingPrice)
        ));

        let above_face = PlaceWagerRequest {
            selling_price: 200.01,
            ..valid_request()
        };
        assert!(validate_place_request(&above_face).is_ok());

        let full = PlaceWagerRequest {
            selling_percentage: 100.0,
            selling_price: 1000.5,
            ..valid_request()
        };
        assert!(validate_place_request(&full).is_ok());
    }

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(&ListWagersRequest { page: 0, limit: 0 }), (0, 10));
        assert_eq!(page_window(&ListWagersRequest { page: 1, limit: 20 }), (0, 20));
        assert_eq!(page_window(&ListWagersRequest { page: 3, limit: 0 }), (20, 10));
        assert_eq!(page_window(&ListWagersRequest { page: 0, limit: 5 }), (0, 5));
    }

    #[test]
    fn test_page_window_saturates_on_huge_values() {
        let req = ListWagersRequest {
            page: u32::MAX,
            limit: u32::MAX,
        };
        assert_eq!(page_window(&req), (i64::MAX, i64::from(u32::MAX)));
    }

    #[tokio::test]
    async fn test_list_far_past_end_is_empty() {
        let store = InMemoryStore::new();
        store.insert_wager(seeded_wager(1)).await;

        let page = catalog(&store)
            .list(&ListWagersRequest {
                page: u32::MAX,
                limit: u32::MAX,
            })
            .await
            .unwrap();

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_place_happy_path() {
        let store = InMemoryStore::new();
        let wager = catalog(&store).place(&valid_request()).await.unwrap();

        assert_eq!(wager.total_wager_value, 1000);
        assert_eq!(wager.odds, 2);
        assert_eq!(wager.selling_percentage, 20.0);
        assert_eq!(wager.selling_price, 201.0);
        assert_eq!(wager.current_selling_price, 201.0);
        assert_eq!(wager.percentage_sold, 0.0);
        assert_eq!(wager.amount_sold, 0);
        assert!(wager.placed_at.is_some());
        assert!(store.wager(wager.id).await.is_some());
    }

    #[tokio::test]
    async fn test_place_validation_error_skips_storage() {
        let store = InMemoryStore::new();
        let req = PlaceWagerRequest {
            total_wager_value: 0,
            ..valid_request()
        };

        let err = catalog(&store).place(&req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTotalWagerValue));
        assert!(store.list_wagers(0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_surfaces_repo_error() {
        let store = InMemoryStore::new();
        store.fail(StoreOp::CreateWager, "some repo error").await;

        let err = catalog(&store).place(&valid_request()).await.unwrap_err();
        assert!(matches!(&err, AppError::Internal(e) if e.to_string() == "some repo error"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryStore::new();
        for id in [111, 222] {
            store.insert_wager(seeded_wager(id)).await;
        }

        let ids: Vec<i32> = catalog(&store)
            .list(&ListWagersRequest { page: 1, limit: 20 })
            .await
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();

        assert_eq!(ids, vec![222, 111]);
    }

    #[tokio::test]
    async fn test_list_second_page() {
        let store = InMemoryStore::new();
        for id in 1..=25 {
            store.insert_wager(seeded_wager(id)).await;
        }

        let page = catalog(&store)
            .list(&ListWagersRequest { page: 2, limit: 0 })
            .await
            .unwrap();

        assert_eq!(page.len(), 10);
        assert_eq!(page.first().map(|w| w.id), Some(15));
        assert_eq!(page.last().map(|w| w.id), Some(6));
    }

    #[tokio::test]
    async fn test_list_surfaces_repo_error() {
        let store = InMemoryStore::new();
        store.fail(StoreOp::ListWagers, "list failed").await;

        let err = catalog(&store)
            .list(&ListWagersRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::Internal(e) if e.to_string() == "list failed"));
    }
}
