//! Telemetry readings received from an EspDRO.
//!
//! The device pushes two kinds of text messages over its WebSocket: free-form
//! status text and JSON objects carrying a position sample. Only the latter
//! start with `{`.

use serde_json::Value;

use crate::error::EspDroError;

/// Key holding the axis position in micrometers.
pub const AXIS0_KEY: &str = "axis0";
/// Key holding the sample timestamp.
pub const TS_KEY: &str = "ts";

/// A single inbound message, kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    text: String,
}

impl Reading {
    /// Wrap a received text message.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The message exactly as received.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message should be decoded as JSON.
    pub fn is_structured(&self) -> bool {
        self.text.starts_with('{')
    }

    /// Decode the message.
    ///
    /// Returns `Ok(None)` for unstructured text, which carries no sample.
    pub fn decode(&self) -> Result<Option<StructuredReading>, EspDroError> {
        if !self.is_structured() {
            return Ok(None);
        }
        StructuredReading::from_json(&self.text).map(Some)
    }

    /// Consume the reading and return the raw text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl From<String> for Reading {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Reading {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// A position sample decoded from a JSON reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredReading {
    /// Axis position in micrometers.
    pub axis0: i64,
    /// Device timestamp.
    pub ts: i64,
}

impl StructuredReading {
    /// Parse a JSON object and extract `axis0` and `ts`.
    ///
    /// Additional keys are ignored.
    pub fn from_json(text: &str) -> Result<Self, EspDroError> {
        let value: Value = serde_json::from_str(text)?;
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(EspDroError::Decode(serde::de::Error::custom(format!(
                    "expected a JSON object, found {}",
                    kind_of(&other)
                ))));
            }
        };

        let axis0 = integer_field(&object, AXIS0_KEY)?;
        let ts = integer_field(&object, TS_KEY)?;
        Ok(Self { axis0, ts })
    }
}

fn integer_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<i64, EspDroError> {
    let value = object
        .get(field)
        .ok_or(EspDroError::MissingField { field })?;
    value.as_i64().ok_or_else(|| EspDroError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
