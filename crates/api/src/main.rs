//! API server entry point.

use api::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use trip_store::{InMemoryTripStore, PostgresTripStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Builds the router over PostgreSQL if configured, otherwise over memory.
async fn build_app(
    config: &Config,
    metrics_handle: PrometheusHandle,
) -> Result<axum::Router, BoxError> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresTripStore::connect(url, config.max_connections).await?;
            store.run_migrations().await?;
            tracing::info!("database migrations applied");

            Ok(api::create_app(
                api::create_default_state(store),
                metrics_handle,
            ))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, trips are kept in memory");

            Ok(api::create_app(
                api::create_default_state(InMemoryTripStore::new()),
                metrics_handle,
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()?;
    api::routes::metrics::describe();

    // 3. Build the application over the configured store
    let app = build_app(&config, metrics_handle).await?;

    // 4. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}
