//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! /etc/splendid/{config, credentials, authorized_keys}
//!     → loader.rs (read lines, check line counts)
//!     → validation.rs (listen address)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the HTTP layer
//!
//! command line / SPLENDID_* environment
//!     → BackendConfig, ServerConfig
//! ```
//!
//! # Design Decisions
//! - Config is loaded once; there is no reload
//! - Any error is fatal to startup, nothing is retried

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, DEFAULT_CONFIG_DIR};
pub use schema::{
    AuthorizedKeys, BackendConfig, Credentials, ListenerConfig, RelayConfig, ServerConfig,
    TlsConfig,
};
