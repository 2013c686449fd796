//! Request validation.
//!
//! # Responsibilities
//! - Decode the request body into a [`Command`]
//! - Check the key against the authorized set
//! - Map device/action/value onto closed variants
//!
//! # Design Decisions
//! - Every function here is pure; nothing touches shared state
//! - The key is checked after decoding but before interpretation, so an
//!   unknown key is rejected whatever the rest of the command says

use serde_json::Value;
use thiserror::Error;

use crate::command::{Action, Command, Device, SwitchCommand, SwitchState};
use crate::config::AuthorizedKeys;

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The body is not a command object.
    #[error("malformed command: {0}")]
    Malformed(String),

    /// The key is not on the allow-list.
    #[error("key is not authorized")]
    Unauthorized,

    /// A field holds a value the relay does not understand.
    #[error("unsupported {field} {value:?}")]
    Unsupported { field: &'static str, value: String },
}

impl ValidationError {
    pub(crate) fn unsupported(field: &'static str, value: &str) -> Self {
        ValidationError::Unsupported {
            field,
            value: value.to_string(),
        }
    }
}

/// Result of validating a body in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Authorized(SwitchCommand),
    Unauthorized,
    Malformed,
    Unsupported,
}

impl From<ValidationError> for Outcome {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Malformed(_) => Outcome::Malformed,
            ValidationError::Unauthorized => Outcome::Unauthorized,
            ValidationError::Unsupported { .. } => Outcome::Unsupported,
        }
    }
}

/// Decode a request body.
///
/// A `null` body or member leaves the command (or field) empty. Members are
/// applied in document order, so the last spelling of a field wins.
pub fn parse(body: &[u8]) -> Result<Command, ValidationError> {
    let members = match serde_json::from_slice(body) {
        Ok(Value::Object(members)) => members,
        Ok(Value::Null) => return Ok(Command::default()),
        Ok(other) => {
            return Err(ValidationError::Malformed(format!(
                "expected an object, found {}",
                json_kind(&other)
            )))
        }
        Err(e) => return Err(ValidationError::Malformed(e.to_string())),
    };

    let mut command = Command::default();
    for (member, value) in members {
        let Some(field) = command.field_mut(&member) else {
            continue;
        };
        match value {
            Value::String(text) => *field = text,
            Value::Null => {}
            other => {
                return Err(ValidationError::Malformed(format!(
                    "{member} must be a string, found {}",
                    json_kind(&other)
                )))
            }
        }
    }
    Ok(command)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Check the command's key against the allow-list.
pub fn authorize(command: &Command, keys: &AuthorizedKeys) -> Result<(), ValidationError> {
    if keys.contains(&command.key) {
        Ok(())
    } else {
        Err(ValidationError::Unauthorized)
    }
}

/// Interpret device, action and value.
pub fn interpret(command: &Command) -> Result<SwitchCommand, ValidationError> {
    let device: Device = command.device.parse()?;
    let action: Action = command.action.parse()?;
    let state: SwitchState = match (device, action) {
        (Device::Switch, Action::Set) => command.value.parse()?,
    };

    Ok(SwitchCommand {
        device,
        action,
        name: command.name.clone(),
        state,
    })
}

/// Parse, authorize and interpret a body.
pub fn validate(body: &[u8], keys: &AuthorizedKeys) -> Outcome {
    let checked = parse(body).and_then(|command| {
        authorize(&command, keys)?;
        interpret(&command)
    });

    match checked {
        Ok(command) => Outcome::Authorized(command),
        Err(err) => err.into(),
    }
}
