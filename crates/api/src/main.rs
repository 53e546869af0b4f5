//! API server entry point.

use std::sync::Arc;

use api::{Config, LogFormat};
use domain::Catalog;
use event_store::{
    EventStore, InMemoryEventStore, InMemoryNumberSequence, NumberSequence, PostgresEventStore,
    PostgresNumberSequence,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Replays the store into the read models, then serves until shutdown.
async fn serve<S: EventStore + Clone + 'static>(
    config: &Config,
    event_store: S,
    numbers: Arc<dyn NumberSequence>,
    catalog: Arc<dyn Catalog>,
    metrics_handle: PrometheusHandle,
) {
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set, admin routes will refuse every request");
    }

    let state = api::create_default_state(event_store, numbers, catalog, config.admin_token.clone());
    state.refresh().await.expect("catch-up failed");

    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration (.env first, if present)
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // 2. Initialize tracing
    init_tracing(&config);

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let catalog: Arc<dyn Catalog> = Arc::new(api::demo_catalog().await);

    // 4. Pick the event store and start serving
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresEventStore::new(pool.clone());
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL event store");

            let numbers = Arc::new(PostgresNumberSequence::new(pool));
            serve(&config, store, numbers, catalog, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory event store");
            let numbers = Arc::new(InMemoryNumberSequence::new());
            serve(
                &config,
                InMemoryEventStore::new(),
                numbers,
                catalog,
                metrics_handle,
            )
            .await;
        }
    }
}
