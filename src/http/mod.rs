//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → dispatch.rs (validate, log in, switch)
//!     → response.rs (status + fixed text)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::{AppState, DispatchError};
pub use request::{RequestIdGenerator, X_REQUEST_ID};
pub use response::StatusReply;
pub use server::{HttpServer, COMMAND_PATH};
