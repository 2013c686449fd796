//! Inbound switch commands.
//!
//! # Data Flow
//! ```text
//! request body (JSON)
//!     → validator::parse      → Command (raw strings)
//!     → validator::authorize  → key checked against the allow-list
//!     → validator::interpret  → SwitchCommand (closed variants)
//! ```
//!
//! `Command` is the wire shape and keeps whatever strings the caller sent.
//! `SwitchCommand` only exists once every field has been understood.

pub mod validator;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use validator::{authorize, interpret, parse, validate, Outcome, ValidationError};

/// A command exactly as it arrived on the wire.
///
/// Decoding lives in [`validator::parse`]: field names match in any case,
/// missing or `null` fields stay empty and unknown fields are ignored.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Command {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl Command {
    /// The field a JSON member name refers to, compared without case.
    fn field_mut(&mut self, member: &str) -> Option<&mut String> {
        match member.to_lowercase().as_str() {
            "key" => Some(&mut self.key),
            "device" => Some(&mut self.device),
            "name" => Some(&mut self.name),
            "action" => Some(&mut self.action),
            "value" => Some(&mut self.value),
            _ => None,
        }
    }
}

impl Command {
    /// Render the command for logs with the key replaced by a marker.
    pub fn redacted(&self, key_valid: bool) -> Redacted<'_> {
        Redacted {
            command: self,
            key_valid,
        }
    }
}

// The key is a bearer secret; keep it out of Debug output as well.
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("key", &"<REDACTED>")
            .field("device", &self.device)
            .field("name", &self.name)
            .field("action", &self.action)
            .field("value", &self.value)
            .finish()
    }
}

/// Log view of a [`Command`].
pub struct Redacted<'a> {
    command: &'a Command,
    key_valid: bool,
}

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.key_valid { "<VALID>" } else { "<INVALID>" };
        write!(
            f,
            "{{ \"key\": {}, \"device\": {:?}, \"name\": {:?}, \"action\": {:?}, \"value\": {:?} }}",
            key, self.command.device, self.command.name, self.command.action, self.command.value
        )
    }
}

/// Device kinds the relay can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Switch,
}

impl FromStr for Device {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "switch" => Ok(Device::Switch),
            other => Err(ValidationError::unsupported("device", other)),
        }
    }
}

/// Actions a device accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Set,
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Action::Set),
            other => Err(ValidationError::unsupported("action", other)),
        }
    }
}

/// Target state of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    Off,
    On,
}

impl FromStr for SwitchState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(SwitchState::Off),
            "1" => Ok(SwitchState::On),
            other => Err(ValidationError::unsupported("value", other)),
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchState::Off => f.write_str("off"),
            SwitchState::On => f.write_str("on"),
        }
    }
}

/// A fully understood command, ready for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCommand {
    pub device: Device,
    pub action: Action,
    /// Backend name of the device, passed through untouched.
    pub name: String,
    pub state: SwitchState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_display_hides_key() {
        let command = Command {
            key: "super-secret".into(),
            device: "switch".into(),
            name: "Lamp".into(),
            action: "set".into(),
            value: "1".into(),
        };

        let valid = command.redacted(true).to_string();
        assert!(valid.contains("<VALID>"));
        assert!(valid.contains("\"Lamp\""));
        assert!(!valid.contains("super-secret"));

        let invalid = command.redacted(false).to_string();
        assert!(invalid.contains("<INVALID>"));

        assert!(!format!("{command:?}").contains("super-secret"));
    }

    #[test]
    fn closed_variants_parse_exact_literals() {
        assert_eq!("switch".parse::<Device>().unwrap(), Device::Switch);
        assert!("Switch".parse::<Device>().is_err());
        assert_eq!("set".parse::<Action>().unwrap(), Action::Set);
        assert!("get".parse::<Action>().is_err());
        assert_eq!("0".parse::<SwitchState>().unwrap(), SwitchState::Off);
        assert_eq!("1".parse::<SwitchState>().unwrap(), SwitchState::On);
        assert!("2".parse::<SwitchState>().is_err());
        assert!(" 1".parse::<SwitchState>().is_err());
    }
}
