//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the `/gghr/` command endpoint
//! - Wire up middleware (request ID, tracing)
//! - Serve over TLS in production, or over a plain listener
//! - Graceful shutdown when the lifecycle signals it

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{routing::any, Router};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::backend::SwitchBackend;
use crate::config::{AuthorizedKeys, ListenerConfig, ServerConfig};
use crate::http::dispatch::{dispatch, AppState};
use crate::http::request::RequestIdGenerator;
use crate::net::tls::load_tls_config;

/// Path of the command endpoint; sub-paths are routed to it as well.
pub const COMMAND_PATH: &str = "/gghr/";

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server around `backend`.
    pub fn new<B: SwitchBackend>(
        backend: Arc<B>,
        authorized_keys: AuthorizedKeys,
        config: ServerConfig,
    ) -> Self {
        let state = AppState {
            backend,
            authorized_keys: Arc::new(authorized_keys),
            body_limit: config.body_limit,
        };

        Self {
            router: Self::build_router(state),
            config,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<B: SwitchBackend>(state: AppState<B>) -> Router {
        Router::new()
            .route("/gghr", any(redirect_to_command_path))
            .route(COMMAND_PATH, any(dispatch::<B>))
            .route("/gghr/{*rest}", any(dispatch::<B>))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
    }

    /// The fully layered router, e.g. for driving it with `oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve HTTPS on the configured address until shutdown is signalled.
    pub async fn run_tls(
        self,
        listener: &ListenerConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let tls = load_tls_config(&listener.tls.cert_path, &listener.tls.key_path).await?;
        let socket = std::net::TcpListener::bind(listener.bind_address)?;

        tracing::info!(
            address = %listener.bind_address,
            cert = %listener.tls.cert_path.display(),
            "HTTPS server starting"
        );
        self.serve_tls(socket, tls, shutdown).await
    }

    /// Serve HTTPS on an already bound listener until shutdown is signalled.
    pub async fn serve_tls(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        listener.set_nonblocking(true)?;
        let handle = Handle::new();

        let grace = Duration::from_secs(self.config.shutdown_grace_secs);
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Serve plain HTTP on an already bound listener until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `/gghr` without the trailing slash answers 301 towards the command path.
async fn redirect_to_command_path(uri: Uri) -> Response {
    let location = match uri.query() {
        Some(query) => format!("{COMMAND_PATH}?{query}"),
        None => COMMAND_PATH.to_string(),
    };
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}
