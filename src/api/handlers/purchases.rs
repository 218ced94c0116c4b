use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::{BuyWagerRequest, PurchaseView};
use crate::AppState;

/// POST /buy/:wager_id — buy one unit of a wager
pub async fn buy(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<BuyWagerRequest>, JsonRejection>,
) -> Result<Json<PurchaseView>, AppError> {
    let wager_id: i32 = raw_id.trim().parse().map_err(|_| {
        tracing::debug!(wager_id = %raw_id, "Invalid wager id in path");
        AppError::NotFound
    })?;

    let Json(mut req) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected buy wager body");
        AppError::InvalidBody
    })?;
    req.wager_id = wager_id;

    let purchase = state.ledger.buy(&req).await?;
    Ok(Json(purchase))
}
