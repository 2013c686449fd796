//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the backend client and prove the credentials work
//! - Start optional metrics exporter
//! - Bind the HTTPS listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener starts last (traffic only when ready)

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::backend::{AuthError, FritzBox, SwitchBackend};
use crate::config::{load_config, BackendConfig, ConfigError, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Settings that come from the command line rather than the config files.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_dir: PathBuf,
    pub backend: BackendConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build backend client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("initial backend login failed: {0}")]
    Login(#[from] AuthError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the relay up and serve until a shutdown signal arrives.
pub async fn run(options: StartupOptions) -> Result<(), StartupError> {
    let config = load_config(&options.config_dir)?;
    tracing::info!(
        config_dir = %options.config_dir.display(),
        bind_address = %config.listener.bind_address,
        authorized_keys = config.authorized_keys.len(),
        "Configuration loaded"
    );

    if options.backend.insecure_tls {
        tracing::warn!(
            backend = %options.backend.url,
            "Backend TLS certificate verification is disabled"
        );
    }

    let backend = FritzBox::new(&options.backend, config.credentials)?;
    backend.login().await?;
    tracing::info!(backend = %backend.base_url(), "Initial backend login succeeded");

    if let Some(addr) = options.server.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_watcher(shutdown.clone());

    let server = HttpServer::new(Arc::new(backend), config.authorized_keys, options.server);
    server.run_tls(&config.listener, shutdown.subscribe()).await?;

    Ok(())
}
