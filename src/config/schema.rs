//! Configuration schema definitions.
//!
//! The relay is configured from two places: the line-delimited files in the
//! configuration directory (listener, credentials, authorized keys) and the
//! command line (backend endpoint and server knobs). Both end up in the
//! types below, which are immutable once startup has finished.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;
use url::Url;

/// Everything read from the configuration directory.
#[derive(Debug)]
pub struct RelayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Credentials for the automation backend.
    pub credentials: Credentials,

    /// Bearer keys allowed to issue commands.
    pub authorized_keys: AuthorizedKeys,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Resolved bind address.
    pub bind_address: SocketAddr,

    /// Certificate and key used to terminate TLS.
    pub tls: TlsConfig,
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Backend login credentials. The username may be empty.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// The allow-list of bearer keys. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKeys(HashSet<String>);

impl AuthorizedKeys {
    /// Build the allow-list, skipping blank entries.
    ///
    /// Returns `None` when no usable key remains.
    pub fn new<I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let keys: HashSet<String> = keys.into_iter().filter(|k| !k.is_empty()).collect();
        if keys.is_empty() {
            None
        } else {
            Some(Self(keys))
        }
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Connection settings for the automation backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g. "https://fritz.box").
    pub url: Url,

    /// Accept any certificate presented by the backend.
    ///
    /// The home router ships a self-signed certificate, so deployments run
    /// with this enabled. It is an explicit switch so that turning
    /// verification on is a visible decision.
    pub insecure_tls: bool,

    /// Connect and request timeout applied by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("https://fritz.box").expect("static URL is valid"),
            insecure_tls: true,
            timeout_secs: 10,
        }
    }
}

/// Knobs for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Largest request body accepted, in bytes.
    pub body_limit: usize,

    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_secs: u64,

    /// Optional Prometheus scrape address.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            body_limit: 64 * 1024,
            shutdown_grace_secs: 10,
            metrics_address: None,
        }
    }
}
