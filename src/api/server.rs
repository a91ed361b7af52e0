//! Staffing API Server implementation
//!
//! HTTP REST API server using Axum. Serves metrics, summary rows and filtered
//! requisitions from a cached snapshot of the staffing workbook.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers;
use crate::config::{DashboardConfig, SheetLayout};
use crate::core::cache::{CachedSnapshot, SnapshotCache};
use crate::error::StaffingResult;
use crate::snapshot::StaffingSnapshot;

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub workbook: PathBuf,
    pub layout: SheetLayout,
    pub refresh_interval: Duration,
}

impl ApiConfig {
    /// Server settings from a dashboard config and a resolved workbook path
    pub fn from_dashboard(config: &DashboardConfig, workbook: PathBuf) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            workbook,
            layout: config.layout.clone(),
            refresh_interval: config.refresh_interval(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub workbook: PathBuf,
    pub layout: SheetLayout,
    cache: Mutex<SnapshotCache>,
}

impl AppState {
    pub fn new(workbook: PathBuf, layout: SheetLayout, refresh_interval: Duration) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            workbook,
            layout,
            cache: Mutex::new(SnapshotCache::new(refresh_interval)),
        }
    }

    fn load(&self) -> StaffingResult<StaffingSnapshot> {
        StaffingSnapshot::load(&self.workbook, &self.layout)
    }

    /// Current snapshot, reloading from disk when the refresh interval has passed
    pub fn snapshot(&self) -> StaffingResult<CachedSnapshot> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_load(Utc::now(), || self.load())
    }

    /// Drop the cached snapshot and reload immediately
    pub fn refresh(&self) -> StaffingResult<CachedSnapshot> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.refresh(Utc::now(), || self.load())
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Dashboard data
        .route("/api/v1/metrics", get(handlers::metrics))
        .route("/api/v1/summary", get(handlers::summary))
        .route("/api/v1/roles", get(handlers::roles))
        .route("/api/v1/filters", get(handlers::filters))
        .route("/api/v1/refresh", post(handlers::refresh))
        // Excel downloads
        .route("/api/v1/export/summary", get(handlers::export_summary))
        .route("/api/v1/export/detailed", get(handlers::export_detailed))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staffing_dashboard=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new(
        config.workbook.clone(),
        config.layout.clone(),
        config.refresh_interval,
    ));

    // Warm the cache; a bad workbook is reported per request, not fatal here
    if let Err(e) = state.snapshot() {
        warn!(error = %e, workbook = %config.workbook.display(), "initial load failed");
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 Staffing API Server starting on http://{}", addr);
    info!("   Workbook: {}", config.workbook.display());
    info!("   Endpoints: /api/v1/metrics, /api/v1/summary, /api/v1/roles, /api/v1/filters, /api/v1/refresh");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Staffing API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
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
                warn!(error = %e, "failed to install SIGTERM handler");
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

    info!("Shutdown signal received, stopping server...");
}
