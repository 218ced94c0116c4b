use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Machine-readable code carried in every error response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidBody,
    InternalError,
    NotFound,
    InvalidTotalWagerValue,
    InvalidOdds,
    InvalidSellingPercentage,
    InvalidSellingPrice,
    InvalidWagerId,
    InvalidBuyingPrice,
    WagerSoldOut,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidBody => "INVALID_BODY",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidTotalWagerValue => "INVALID_TOTAL_WAGER_VALUE",
            ErrorCode::InvalidOdds => "INVALID_ODDS",
            ErrorCode::InvalidSellingPercentage => "INVALID_SELLING_PERCENTAGE",
            ErrorCode::InvalidSellingPrice => "INVALID_SELLING_PRICE",
            ErrorCode::InvalidWagerId => "INVALID_WAGER_ID",
            ErrorCode::InvalidBuyingPrice => "INVALID_BUYING_PRICE",
            ErrorCode::WagerSoldOut => "WAGER_SOLD_OUT",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid request body")]
    InvalidBody,

    #[error("total wager value must be at least 1")]
    InvalidTotalWagerValue,

    #[error("odds must be at least 1")]
    InvalidOdds,

    #[error("selling percentage must be between 1 and 100")]
    InvalidSellingPercentage,

    #[error("selling price must exceed the proportional wager value")]
    InvalidSellingPrice,

    #[error("wager id is missing")]
    InvalidWagerId,

    #[error("invalid buying price")]
    InvalidBuyingPrice,

    #[error("wager not found")]
    NotFound,

    #[error("wager is sold out")]
    WagerSoldOut,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidBody => ErrorCode::InvalidBody,
            AppError::InvalidTotalWagerValue => ErrorCode::InvalidTotalWagerValue,
            AppError::InvalidOdds => ErrorCode::InvalidOdds,
            AppError::InvalidSellingPercentage => ErrorCode::InvalidSellingPercentage,
            AppError::InvalidSellingPrice => ErrorCode::InvalidSellingPrice,
            AppError::InvalidWagerId => ErrorCode::InvalidWagerId,
            AppError::InvalidBuyingPrice => ErrorCode::InvalidBuyingPrice,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::WagerSoldOut => ErrorCode::WagerSoldOut,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::WagerSoldOut => StatusCode::NOT_ACCEPTABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorCode,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(e) = &self {
            tracing::error!("Internal error: {e:?}");
        }

        (self.status(), Json(ErrorBody { error: self.code() })).into_response()
    }
}
