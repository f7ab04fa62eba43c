//! Error types for the EspDRO client library.

use thiserror::Error;

/// The main error type for all EspDRO client operations.
#[derive(Error, Debug)]
pub enum EspDroError {
    /// The endpoint was unreachable or the WebSocket handshake failed.
    #[error("Failed to connect to {url}: {source}")]
    Connection {
        /// Address that was dialled
        url: String,
        /// Underlying transport error
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// WebSocket connection closed by the peer or lost mid-stream
    #[error("WebSocket connection closed: {reason}")]
    ConnectionClosed {
        /// Reason for the closure
        reason: String,
    },

    /// A `{`-prefixed message was not a valid JSON object
    #[error("Failed to decode reading: {0}")]
    Decode(#[from] serde_json::Error),

    /// A decoded reading lacks a required key
    #[error("Reading is missing required field `{field}`")]
    MissingField {
        /// Name of the absent key
        field: &'static str,
    },

    /// A required key is present but does not hold an integer
    #[error("Reading field `{field}` is not an integer: {value}")]
    InvalidField {
        /// Name of the offending key
        field: &'static str,
        /// The value as it appeared in the message
        value: String,
    },

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The address parsed but is not a WebSocket URL
    #[error("Unsupported URL scheme `{0}`, expected ws or wss")]
    UnsupportedScheme(String),

    /// Connect or receive timed out
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Writing to an output sink failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl EspDroError {
    /// Check if this error concerns a single message rather than the connection.
    ///
    /// These are the errors a caller may choose to skip instead of aborting.
    pub fn is_message_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::MissingField { .. } | Self::InvalidField { .. }
        )
    }

    /// Check if the connection is gone.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_errors() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(EspDroError::Decode(decode).is_message_error());
        assert!(EspDroError::MissingField { field: "ts" }.is_message_error());
        assert!(
            EspDroError::InvalidField {
                field: "axis0",
                value: "\"abc\"".into()
            }
            .is_message_error()
        );

        let closed = EspDroError::ConnectionClosed {
            reason: "bye".into(),
        };
        assert!(!closed.is_message_error());
        assert!(closed.is_connection_closed());
    }

    #[test]
    fn test_error_display() {
        let error = EspDroError::MissingField { field: "ts" };
        assert_eq!(error.to_string(), "Reading is missing required field `ts`");

        let error = EspDroError::UnsupportedScheme("http".into());
        assert_eq!(
            error.to_string(),
            "Unsupported URL scheme `http`, expected ws or wss"
        );
    }
}
