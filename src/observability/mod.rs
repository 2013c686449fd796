//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events → log file)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log file (append-only, human readable)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Bearer keys and passwords never reach a log line

pub mod logging;
pub mod metrics;
