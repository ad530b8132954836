use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{storage, LodeService};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Parse the key layout and open the configured backend.
/// A malformed template aborts startup here.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let backend = storage::build_backend(cfg).await?;
    let lode = LodeService::from_config(&cfg.lode, backend)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let keys = lode.keys();
    info!(
        search = ?keys.search_list().templates().iter().map(|t| t.as_str()).collect::<Vec<_>>(),
        write = %keys.write_template(),
        storage = lode.backend_kind(),
        "key templates loaded"
    );
    Ok(AppState::new(lode))
}

/// Build the app for an already validated config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Serve until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    if cfg.server.https {
        // TLS 由前置代理终止，本服务只提供明文 HTTP
        warn!("server.https is set; TLS must be terminated in front of this service");
    }

    let app = build_app(&cfg).await?;

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "starting lode server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
