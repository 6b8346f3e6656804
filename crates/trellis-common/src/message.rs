//! Wire shape of bridge messages.
//!
//! A message is a flat JSON object: `{ "command": "...", ...payload }`.
//! There is no envelope; every field other than `command` belongs to the
//! payload and is carried through untouched.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::BridgeError;

/// Payload key used by `error` messages.
pub const ERROR_FIELD: &str = "ex";

/// Dispatch key of a message.
///
/// Commands the bridge itself understands get their own variant; anything
/// else the two sides agree on travels as `Custom`. Equality and hashing
/// follow the wire string, so `Custom("error")` and `Error` are one key.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "String")]
pub enum Command {
    /// Fault report from the other side. Payload carries `ex`.
    Error,
    Custom(String),
}

impl Command {
    pub fn as_str(&self) -> &str {
        match self {
            Command::Error => "error",
            Command::Custom(name) => name,
        }
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Command {}

impl Hash for Command {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "error" => Command::Error,
            other => Command::Custom(other.to_string()),
        }
    }
}

impl From<String> for Command {
    fn from(s: String) -> Self {
        if s == "error" {
            Command::Error
        } else {
            Command::Custom(s)
        }
    }
}

impl From<Command> for String {
    fn from(c: Command) -> Self {
        match c {
            Command::Error => "error".to_string(),
            Command::Custom(name) => name,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bridge message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    command: Command,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Message {
    /// Build a message from a command and a payload.
    ///
    /// Object payloads are merged at the top level. `null` means no payload.
    /// Any other value is carried under a `data` key. An empty command is
    /// rejected.
    pub fn new(command: impl Into<Command>, payload: Value) -> Result<Self, BridgeError> {
        let command = command.into();
        if command.as_str().is_empty() {
            return Err(BridgeError::MalformedMessage("command is empty".into()));
        }
        let mut fields = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        fields.remove("command");
        Ok(Self {
            command,
            payload: fields,
        })
    }

    /// Build an `error` message carrying a human-readable description.
    pub fn error(description: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert(ERROR_FIELD.to_string(), Value::String(description.into()));
        Self {
            command: Command::Error,
            payload,
        }
    }

    /// Parse a message from a raw JSON string posted by the other side.
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| BridgeError::MalformedMessage(format!("invalid JSON: {e}")))?;
        Self::try_from(value)
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Look up a single payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Serialize to the flat wire form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"command\":{}}}",
                Value::String(self.command.to_string())
            )
        })
    }
}

impl TryFrom<Value> for Message {
    type Error = BridgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(BridgeError::MalformedMessage(
                "message is not a JSON object".into(),
            ));
        };
        match fields.remove("command") {
            Some(Value::String(name)) if !name.is_empty() => Ok(Self {
                command: Command::from(name),
                payload: fields,
            }),
            Some(Value::String(_)) => Err(BridgeError::MalformedMessage(
                "command is empty".into(),
            )),
            Some(_) => Err(BridgeError::MalformedMessage(
                "command is not a string".into(),
            )),
            None => Err(BridgeError::MalformedMessage("command is missing".into())),
        }
    }
}
