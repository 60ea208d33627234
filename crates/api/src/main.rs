use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, LazyLock};

use recipebox_api::config::{ConfigError, ServerConfig};
use recipebox_api::router::build_app_router;
use recipebox_api::state::AppState;
use recipebox_core::imaging::DEFAULT_IMAGE;
use recipebox_db::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebox_api=debug,recipebox_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

    let pool = recipebox_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    recipebox_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    recipebox_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // Render the placeholder before the first request needs it.
    LazyLock::force(&DEFAULT_IMAGE);

    // --- App ---
    let host: IpAddr = config.host.parse().map_err(|_| ConfigError::Invalid {
        name: "HOST",
        value: config.host.clone(),
    })?;
    let addr = SocketAddr::new(host, config.port);

    let state = AppState::new(Arc::new(PgStore::new(pool)), config);
    let app = build_app_router(state)?;

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on Unix. If a handler cannot be
/// installed that signal is simply never observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
