//! House price prediction server
//!
//! Serves the prediction form, the JSON API and the health endpoint over a
//! single lazily loaded model package.

mod api;
mod error;
mod handlers;
mod pages;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::{PredictResponse, ALGORITHM_NAME, PERSISTENCE_METHOD};
pub use pages::{escape_html, format_currency};
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::artifact::DEFAULT_MODEL_PATH;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Location of the model artifact
    pub model_path: PathBuf,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    let state = Arc::new(AppState::new(config.clone()));

    // Load up front so the first request does not pay for it. The server
    // still starts without a model; /health reports why.
    match state.models.get().await {
        Ok(package) => info!(
            model_path = %config.model_path.display(),
            neighborhoods = package.neighborhoods.len(),
            "Model ready"
        ),
        Err(e) => warn!(
            model_path = %config.model_path.display(),
            error = %e,
            "Model not loaded at startup, will retry on first request"
        ),
    }

    let app = create_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        host = %config.host,
        port = config.port,
        address = %addr,
        started_at = %start_time.to_rfc3339(),
        "House price server starting"
    );
    info!(url = %format!("http://{}", addr), "Prediction form available");
    info!(url = %format!("http://{}/api/predict", addr), "REST API available");
    info!(url = %format!("http://{}/health", addr), "Health endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        if std::env::var("API_PORT").is_err() {
            assert_eq!(config.port, 5000);
        }
        if std::env::var("MODEL_PATH").is_err() {
            assert_eq!(config.model_path, PathBuf::from("model/house_price_model.json"));
        }
        assert!(config.max_body_bytes > 0);
    }
}
