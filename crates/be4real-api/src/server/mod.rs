//! Server setup and initialization
//!
//! Builds the application from configuration, runs optional background
//! reconciliation and serves until a shutdown signal arrives.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use be4real_common::{AppConfig, AppError, JwtService};
use be4real_core::SnowflakeGenerator;
use be4real_db::{create_pool, run_migrations, PoolConfig, DEFAULT_MIGRATIONS_DIR};
use be4real_service::{ReconcileService, ServiceContext};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::response::not_found;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(health_routes()
        .merge(api)
        .fallback(not_found)
        .with_state(state))
}

/// Connect to PostgreSQL, run migrations and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, Path::new(DEFAULT_MIGRATIONS_DIR))
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    }

    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.expiry_secs));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContext::builder()
        .postgres(pool)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .max_image_bytes(config.posts.max_image_bytes)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Periodically rebuild denormalized reaction counters
pub fn spawn_reconciler(state: AppState) -> Option<JoinHandle<()>> {
    let reconcile = &state.config().reconcile;
    if !reconcile.is_enabled() {
        return None;
    }
    let period = Duration::from_secs(reconcile.interval_secs);
    info!(interval_secs = reconcile.interval_secs, "Background reconciliation enabled");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // the first tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = ReconcileService::new(state.service_context())
                .reconcile_all()
                .await
            {
                warn!(error = %e, "Reconciliation pass failed");
            }
        }
    }))
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Run the HTTP server until shutdown
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let local: Option<SocketAddr> = listener.local_addr().ok();
    info!(addr = ?local, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let reconciler = spawn_reconciler(state.clone());
    let app = create_app(state.clone())?;

    let result = run_server(app, &addr).await;

    if let Some(handle) = reconciler {
        handle.abort();
    }
    if let Some(pool) = state.service_context().pool() {
        pool.close().await;
    }
    info!("Server stopped");

    result
}
