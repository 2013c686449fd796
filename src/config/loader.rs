//! Configuration loading from disk.
//!
//! The configuration directory holds three line-delimited text files:
//!
//! | file              | lines | meaning                                   |
//! |-------------------|-------|-------------------------------------------|
//! | `config`          | 1     | `host:port` (cert/key default in the dir) |
//! | `config`          | 3     | `host:port`, cert path, key path          |
//! | `credentials`     | 1     | password (empty username)                 |
//! | `credentials`     | 2     | username, password                        |
//! | `authorized_keys` | 1+    | one bearer key per line                   |

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AuthorizedKeys, Credentials, ListenerConfig, RelayConfig, TlsConfig};
use crate::config::validation::parse_listen_address;

/// Directory searched when none is given on the command line.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/splendid";

pub const ENDPOINT_FILE: &str = "config";
pub const CREDENTIALS_FILE: &str = "credentials";
pub const AUTHORIZED_KEYS_FILE: &str = "authorized_keys";

const DEFAULT_CERT_FILE: &str = "cert.pem";
const DEFAULT_KEY_FILE: &str = "key.pem";

/// Error type for configuration loading. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line count in {file} file: {found} (expected {expected})")]
    LineCount {
        file: &'static str,
        found: usize,
        expected: &'static str,
    },

    #[error("no authorized keys available")]
    NoAuthorizedKeys,

    #[error("invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },
}

/// Load and validate the relay configuration from `dir`.
pub fn load_config(dir: &Path) -> Result<RelayConfig, ConfigError> {
    let listener = parse_endpoint(&read_lines(&dir.join(ENDPOINT_FILE))?, dir)?;
    let credentials = parse_credentials(read_lines(&dir.join(CREDENTIALS_FILE))?)?;
    let authorized_keys = parse_authorized_keys(read_lines(&dir.join(AUTHORIZED_KEYS_FILE))?)?;

    tracing::debug!(
        dir = %dir.display(),
        bind_address = %listener.bind_address,
        authorized_keys = authorized_keys.len(),
        "Configuration files parsed"
    );

    Ok(RelayConfig {
        listener,
        credentials,
        authorized_keys,
    })
}

/// Read a file as text lines. A trailing newline does not produce an extra
/// empty line and a trailing `\r` is dropped from each line.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Interpret the endpoint file. Relative default cert/key paths live in `dir`.
pub fn parse_endpoint(lines: &[String], dir: &Path) -> Result<ListenerConfig, ConfigError> {
    let (address, tls) = match lines {
        [address] => (
            address,
            TlsConfig {
                cert_path: dir.join(DEFAULT_CERT_FILE),
                key_path: dir.join(DEFAULT_KEY_FILE),
            },
        ),
        [address, cert, key] => (
            address,
            TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            },
        ),
        _ => {
            return Err(ConfigError::LineCount {
                file: ENDPOINT_FILE,
                found: lines.len(),
                expected: "1 or 3",
            })
        }
    };

    Ok(ListenerConfig {
        bind_address: parse_listen_address(address)?,
        tls,
    })
}

/// Interpret the credentials file.
pub fn parse_credentials(lines: Vec<String>) -> Result<Credentials, ConfigError> {
    let found = lines.len();
    let mut lines = lines.into_iter();
    match (lines.next(), lines.next(), lines.next()) {
        (Some(password), None, None) => Ok(Credentials {
            username: String::new(),
            password: password.into(),
        }),
        (Some(username), Some(password), None) => Ok(Credentials {
            username,
            password: password.into(),
        }),
        _ => Err(ConfigError::LineCount {
            file: CREDENTIALS_FILE,
            found,
            expected: "1 or 2",
        }),
    }
}

/// Interpret the authorized keys file.
pub fn parse_authorized_keys(lines: Vec<String>) -> Result<AuthorizedKeys, ConfigError> {
    AuthorizedKeys::new(lines).ok_or(ConfigError::NoAuthorizedKeys)
}
