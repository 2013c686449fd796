//! Command dispatch.
//!
//! # State Machine
//! ```text
//! receive ── method ≠ POST ─────────────▶ 405
//!    │
//! read body ── I/O error / too large ───▶ 400
//!    │
//! parse ── not a command ───────────────▶ 400
//!    │
//! authorize ── unknown key ─────────────▶ 403
//!    │
//! backend login ── failure ─────────────▶ 500
//!    │
//! interpret ── device/action/value ─────▶ 406
//!    │
//! turn on/off ── backend error ─────────▶ 406
//!    │
//!    ▼
//!   200
//! ```
//!
//! Every failure is terminal for the request; nothing is retried.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Method, Request},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{ActionError, AuthError, SwitchBackend, SwitchSession};
use crate::command::{self, ValidationError};
use crate::config::AuthorizedKeys;
use crate::http::request::request_id;
use crate::http::response::StatusReply;
use crate::observability::metrics;

/// Application state injected into the handler.
pub struct AppState<B> {
    pub backend: Arc<B>,
    pub authorized_keys: Arc<AuthorizedKeys>,
    pub body_limit: usize,
}

// Derive would demand `B: Clone`; only the Arc is cloned.
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            authorized_keys: Arc::clone(&self.authorized_keys),
            body_limit: self.body_limit,
        }
    }
}

/// Everything that can end a request early.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("method {0} not allowed")]
    Method(Method),

    #[error("failed to read request body: {0}")]
    Transport(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("backend login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("backend action failed: {0}")]
    Action(#[from] ActionError),
}

impl DispatchError {
    pub fn reply(&self) -> StatusReply {
        match self {
            DispatchError::Method(_) => StatusReply::MethodNotAllowed,
            DispatchError::Transport(_) => StatusReply::BadRequest,
            DispatchError::Validation(ValidationError::Malformed(_)) => StatusReply::BadRequest,
            DispatchError::Validation(ValidationError::Unauthorized) => StatusReply::Forbidden,
            DispatchError::Validation(ValidationError::Unsupported { .. }) => {
                StatusReply::NotAcceptable
            }
            DispatchError::Auth(_) => StatusReply::InternalServerError,
            DispatchError::Action(_) => StatusReply::NotAcceptable,
        }
    }
}

/// Handler for `/gghr/`.
pub async fn dispatch<B: SwitchBackend>(
    State(state): State<AppState<B>>,
    request: Request<Body>,
) -> StatusReply {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!(
        request_id = %request_id,
        "Received {} request from {}.",
        method,
        remote_addr
    );

    let reply = match process(&state, request).await {
        Ok(()) => StatusReply::Ok,
        Err(err) => {
            warn!(request_id = %request_id, error = %err, "Request refused");
            err.reply()
        }
    };

    metrics::record_request(reply.status().as_u16(), start_time);
    info!(
        request_id = %request_id,
        status = reply.status().as_u16(),
        "{}",
        reply.text()
    );
    reply
}

async fn process<B: SwitchBackend>(
    state: &AppState<B>,
    request: Request<Body>,
) -> Result<(), DispatchError> {
    if request.method() != Method::POST {
        return Err(DispatchError::Method(request.method().clone()));
    }

    let body = axum::body::to_bytes(request.into_body(), state.body_limit)
        .await
        .map_err(|e| DispatchError::Transport(e.to_string()))?;

    let command = command::parse(&body)?;

    if let Err(err) = command::authorize(&command, &state.authorized_keys) {
        info!(command = %command.redacted(false), "Rejected command");
        return Err(err.into());
    }
    info!(command = %command.redacted(true), "Accepted command");

    let session = state.backend.login().await.inspect_err(|_| {
        metrics::record_backend_login(false);
    })?;
    metrics::record_backend_login(true);

    let switch = command::interpret(&command)?;
    session.set(&switch.name, switch.state).await?;

    info!(name = %switch.name, state = %switch.state, "Switch updated");
    Ok(())
}
