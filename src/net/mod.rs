//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (rustls handshake with the configured certificate)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Certificate files are checked before the listener binds, so a missing
//!   file fails startup with a readable error

pub mod tls;
