//! Authenticated HTTPS relay for home-automation switches.

pub mod backend;
pub mod command;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use backend::{SwitchBackend, SwitchSession};
pub use command::{Command, SwitchCommand};
pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
