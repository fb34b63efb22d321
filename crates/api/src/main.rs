use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventsync_api::config::{ServerConfig, StoreBackend};
use eventsync_api::router::build_router;
use eventsync_api::state::AppState;
use eventsync_db::{DbPool, MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // `LOG_FORMAT=json` switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "eventsync_api=debug,eventsync_engine=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Loaded server configuration"
    );

    // --- Store ---
    let (store, pool): (Arc<dyn Store>, Option<DbPool>) = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = connect_postgres().await;
            let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    let config = Arc::new(config);
    let state = AppState::new(store, Arc::clone(&config));
    let app = build_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    });

    // In-flight requests get `shutdown_timeout_secs` to drain after the signal.
    let drain_deadline = async {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(Duration::from_secs(config.shutdown_timeout_secs)).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Shutdown timeout elapsed with requests still in flight"
            );
        }
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Connect, verify and migrate the PostgreSQL database named by `DATABASE_URL`.
async fn connect_postgres() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = eventsync_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    eventsync_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    eventsync_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    pool
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly under process managers as well as in a terminal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
