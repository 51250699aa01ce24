//! Channel record as reported by `zato.http-soap.get-list`
//!
//! Records are kept as loose JSON objects: the list endpoint returns more
//! fields than the create endpoint accepts, and a backup must carry all of
//! them unchanged. Only `connection` is ever required.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One HTTP channel or outgoing connection in raw (list) form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelRecord(Map<String, Value>);

impl ChannelRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw lookup, `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Optional lookup: an absent key reads as `null`
    pub fn field(&self, key: &str) -> Value {
        self.0.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Name for log lines
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("<unnamed>")
    }

    /// Platform-managed channels must never be backed up or restored
    pub fn is_internal(&self) -> bool {
        self.0.get("is_internal").is_some_and(is_truthy)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ChannelRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for ChannelRecord {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Direction of a connection in request form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Inbound endpoint exposed by Zato
    Channel,
    /// Connection Zato uses to call other systems
    Outgoing,
}

impl ConnectionKind {
    /// Only the exact string `"channel"` is inbound
    pub fn from_raw(value: &Value) -> Self {
        match value.as_str() {
            Some("channel") => Self::Channel,
            _ => Self::Outgoing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Outgoing => "outgoing",
        }
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Truthiness as the Zato API means it: null, false, zero and empty
/// strings/arrays/objects are all "nothing".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
