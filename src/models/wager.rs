use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database row for the wagers table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Wager {
    pub id: i32,
    pub total_wager_value: i64,
    pub odds: i64,
    pub selling_percentage: f64,
    pub selling_price: f64,
    pub current_selling_price: f64,
    pub percentage_sold: Option<f64>,
    pub amount_sold: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wager {
    /// Units sold so far; an absent column reads as zero.
    pub fn units_sold(&self) -> i64 {
        self.amount_sold.unwrap_or(0)
    }

    pub fn is_sold_out(&self) -> bool {
        self.units_sold() >= self.total_wager_value
    }

    /// Apply one accepted purchase to the aggregate.
    ///
    /// Each purchase counts as a single unit. `percentage_sold` is always
    /// derived from the new unit count so repeated sales never drift.
    pub fn record_sale(&mut self, buying_price: f64) {
        let sold = self.units_sold() + 1;
        self.amount_sold = Some(sold);
        self.percentage_sold = Some(sold as f64 * 100.0 / self.total_wager_value as f64);
        self.current_selling_price = buying_price;
    }
}

/// Values supplied at placement; storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWager {
    pub total_wager_value: i64,
    pub odds: i64,
    pub selling_percentage: f64,
    pub selling_price: f64,
    pub current_selling_price: f64,
    pub percentage_sold: f64,
    pub amount_sold: i64,
}
