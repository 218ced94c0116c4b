use std::sync::Arc;

use tokio::signal;

use wager_exchange::api::router::create_router;
use wager_exchange::config::{AppConfig, LogFormat};
use wager_exchange::db::{self, PgPurchaseRepo, PgWagerRepo};
use wager_exchange::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let addr = config.listen_addr();

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database).await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        "Database connected"
    );

    let metrics_handle = wager_exchange::metrics::init_metrics()?;

    let state = AppState::new(
        Arc::new(PgWagerRepo::new(pool.clone())),
        Arc::new(PgPurchaseRepo::new(pool.clone())),
        &config.purchase,
        metrics_handle,
    );
    tracing::info!(
        isolation = ?config.purchase.isolation,
        compensation_timeout_secs = config.purchase.compensation_timeout.as_secs(),
        "Purchase ledger ready"
    );

    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server exiting");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down server...");
}
