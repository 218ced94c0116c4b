//! Shapes exchanged with callers of the wager services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /wagers`. Missing fields decode as zero and are then
/// rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceWagerRequest {
    pub total_wager_value: u32,
    pub odds: u32,
    pub selling_percentage: f64,
    pub selling_price: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListWagersRequest {
    pub page: u32,
    pub limit: u32,
}

/// Body of `POST /buy/:wager_id`; the id comes from the path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyWagerRequest {
    #[serde(skip)]
    pub wager_id: i32,
    pub buying_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerView {
    pub id: i32,
    pub total_wager_value: i64,
    pub odds: i64,
    pub selling_percentage: f64,
    pub selling_price: f64,
    pub current_selling_price: f64,
    pub percentage_sold: f64,
    pub amount_sold: i64,
    pub placed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseView {
    pub id: i32,
    pub wager_id: i32,
    pub buying_price: f64,
    pub bought_at: Option<DateTime<Utc>>,
}
