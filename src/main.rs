//! splendid: authenticated HTTPS relay for FRITZ!Box switches.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    SPLENDID                      │
//!   POST /gghr/       │  ┌─────────┐   ┌──────────┐   ┌───────────────┐  │
//!   ──────────────────┼─▶│ net/tls │──▶│   http   │──▶│   command     │  │
//!                     │  │ rustls  │   │ dispatch │   │   validator   │  │
//!                     │  └─────────┘   └────┬─────┘   └───────────────┘  │
//!                     │                     │                            │
//!                     │                     ▼                            │
//!   200/400/403/      │               ┌───────────┐                      │
//!   405/406/500       │               │  backend  │──────────────────────┼──▶ FRITZ!Box
//!   ◀─────────────────┼───────────────│  session  │                      │   (AHA-HTTP)
//!                     │               └───────────┘                      │
//!                     │  config · lifecycle · observability              │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use url::Url;

use splendid::config::{BackendConfig, ServerConfig, DEFAULT_CONFIG_DIR};
use splendid::lifecycle::{self, StartupOptions};
use splendid::observability::logging::{self, DEFAULT_LOG_FILE};

#[derive(Parser)]
#[command(name = "splendid")]
#[command(about = "Authenticated HTTPS relay for home-automation switches", long_about = None)]
struct Cli {
    /// Directory holding the config, credentials and authorized_keys files
    #[arg(long, env = "SPLENDID_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Append-only log file
    #[arg(long, env = "SPLENDID_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Base URL of the FRITZ!Box
    #[arg(long, env = "SPLENDID_BACKEND_URL", default_value = "https://fritz.box")]
    backend_url: Url,

    /// Skip certificate verification towards the backend (self-signed router certificate)
    #[arg(
        long,
        env = "SPLENDID_BACKEND_INSECURE_TLS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    backend_insecure_tls: bool,

    /// Connect and request timeout for backend calls, in seconds
    #[arg(long, env = "SPLENDID_BACKEND_TIMEOUT_SECS", default_value_t = 10)]
    backend_timeout_secs: u64,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "SPLENDID_BODY_LIMIT", default_value_t = 64 * 1024)]
    body_limit: usize,

    /// Grace period for in-flight requests on shutdown, in seconds
    #[arg(long, env = "SPLENDID_SHUTDOWN_GRACE_SECS", default_value_t = 10)]
    shutdown_grace_secs: u64,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "SPLENDID_METRICS_ADDRESS")]
    metrics_address: Option<SocketAddr>,
}

impl From<Cli> for StartupOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config_dir: cli.config_dir,
            backend: BackendConfig {
                url: cli.backend_url,
                insecure_tls: cli.backend_insecure_tls,
                timeout_secs: cli.backend_timeout_secs,
            },
            server: ServerConfig {
                body_limit: cli.body_limit,
                shutdown_grace_secs: cli.shutdown_grace_secs,
                metrics_address: cli.metrics_address,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let guard = logging::init_logging(Some(cli.log_file.as_path()));
    if let Some(reason) = &guard.fallback {
        tracing::warn!(reason = %reason, "Log file unavailable, logging to stderr");
    }

    tracing::info!("splendid v{} starting up", env!("CARGO_PKG_VERSION"));

    if let Err(e) = lifecycle::run(cli.into()).await {
        tracing::error!(error = %e, "Relay stopped with an error");
        drop(guard);
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
