use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn create_router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/health", get(handlers::ops::health_check))
        .route("/metrics", get(handlers::ops::metrics));

    let api = Router::new()
        .route("/wagers", get(handlers::wagers::list).post(handlers::wagers::place))
        .route("/buy/:wager_id", post(handlers::purchases::buy));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(api)
        .layer(cors)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
