use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ListWagersRequest, PlaceWagerRequest, WagerView};
use crate::AppState;

/// Raw query string; unparseable values fall back to zero.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// POST /wagers — place a new wager
pub async fn place(
    State(state): State<AppState>,
    body: Result<Json<PlaceWagerRequest>, JsonRejection>,
) -> Result<Json<WagerView>, AppError> {
    let Json(req) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected place wager body");
        AppError::InvalidBody
    })?;

    let wager = state.catalog.place(&req).await?;
    Ok(Json(wager))
}

/// GET /wagers?page=&limit= — newest wagers first
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WagerView>>, AppError> {
    let req = ListWagersRequest {
        page: parse_param("page", params.page.as_deref()),
        limit: parse_param("limit", params.limit.as_deref()),
    };

    let wagers = state.catalog.list(&req).await?;
    Ok(Json(wagers))
}

fn parse_param(name: &str, raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };

    raw.parse().unwrap_or_else(|e| {
        tracing::warn!(param = name, value = raw, error = %e, "Ignoring invalid query parameter");
        0
    })
}
