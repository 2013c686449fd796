//! Home-automation backend subsystem.
//!
//! # Data Flow
//! ```text
//! Credentials + BackendConfig
//!     → SwitchBackend::login()      (one fresh session per dispatch)
//!     → SwitchSession::turn_on/off  (device addressed by name)
//! ```
//!
//! # Design Decisions
//! - The HTTP layer only sees the two traits below
//! - A session is a plain value owned by one request; nothing mutable is
//!   shared between concurrent requests
//! - No retries: a failed login or action is reported as-is

pub mod challenge;
pub mod fritz;

use std::future::Future;

use thiserror::Error;

use crate::command::SwitchState;

pub use fritz::{FritzBox, FritzSession};

/// Login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend could not be reached or answered garbage at the HTTP level.
    #[error("backend transport error: {0}")]
    Transport(String),

    /// The backend refuses logins for the given number of seconds.
    #[error("backend login blocked for {0} seconds")]
    Blocked(u64),

    /// The credentials were not accepted.
    #[error("backend rejected the credentials")]
    Rejected,

    /// The backend spoke a dialect we do not understand.
    #[error("backend protocol error: {0}")]
    Protocol(String),
}

/// Device action failures.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("backend transport error: {0}")]
    Transport(String),

    /// No device carries the requested name.
    #[error("unknown device {0:?}")]
    UnknownDevice(String),

    /// The backend answered but refused the command.
    #[error("backend rejected the command: {0}")]
    Rejected(String),
}

/// Something that can open authenticated sessions.
pub trait SwitchBackend: Send + Sync + 'static {
    type Session: SwitchSession;

    /// Authenticate and return a fresh session.
    fn login(&self) -> impl Future<Output = Result<Self::Session, AuthError>> + Send;
}

/// An authenticated session able to drive switches by name.
pub trait SwitchSession: Send + Sync {
    fn turn_on(&self, name: &str) -> impl Future<Output = Result<(), ActionError>> + Send;

    fn turn_off(&self, name: &str) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// Drive a switch to `state`.
    fn set(
        &self,
        name: &str,
        state: SwitchState,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        async move {
            match state {
                SwitchState::On => self.turn_on(name).await,
                SwitchState::Off => self.turn_off(name).await,
            }
        }
    }
}
