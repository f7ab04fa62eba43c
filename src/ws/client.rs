//! WebSocket client implementation.

use std::time::Duration;

use tokio_tungstenite::connect_async;
use url::Url;

use crate::error::EspDroError;
use crate::ws::stream::ReadingStream;

/// WebSocket endpoint URLs.
pub mod endpoints {
    /// Address an EspDRO announces itself under on the local network.
    pub const DEFAULT_URL: &str = "ws://espdro:81";
}

/// Environment variables read by [`ClientConfig::from_env`].
pub mod env_vars {
    /// Endpoint address.
    pub const URL: &str = "ESPDRO_URL";
    /// Echo raw messages to the diagnostic sink.
    pub const DIAGNOSTICS: &str = "ESPDRO_DIAGNOSTICS";
    /// Skip malformed messages instead of stopping.
    pub const SKIP_MALFORMED: &str = "ESPDRO_SKIP_MALFORMED";
    /// Receive timeout in seconds.
    pub const RECEIVE_TIMEOUT_SECS: &str = "ESPDRO_RECEIVE_TIMEOUT_SECS";
    /// Connect timeout in seconds.
    pub const CONNECT_TIMEOUT_SECS: &str = "ESPDRO_CONNECT_TIMEOUT_SECS";
}

/// What to do with a message that starts with `{` but cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Stop the receive loop with the decode error.
    #[default]
    Fatal,
    /// Log a warning and continue with the next message.
    Skip,
}

/// Configuration for the telemetry client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint address.
    pub url: String,
    /// Echo every raw message to the diagnostic sink.
    pub diagnostics: bool,
    /// Handling of undecodable messages.
    pub malformed_policy: MalformedPolicy,
    /// Connect timeout (None = wait for the OS).
    pub connect_timeout: Option<Duration>,
    /// Receive timeout (None = wait indefinitely).
    pub receive_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: endpoints::DEFAULT_URL.to_string(),
            diagnostics: false,
            malformed_policy: MalformedPolicy::Fatal,
            connect_timeout: None,
            receive_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load configuration from the process environment.
    ///
    /// Unset variables keep their defaults. See [`env_vars`] for the names.
    pub fn from_env() -> Result<Self, EspDroError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EspDroError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ClientConfig::builder();

        if let Some(url) = lookup(env_vars::URL) {
            builder = builder.url(url);
        }
        if let Some(value) = lookup(env_vars::DIAGNOSTICS) {
            builder = builder.diagnostics(parse_flag(env_vars::DIAGNOSTICS, &value)?);
        }
        if let Some(value) = lookup(env_vars::SKIP_MALFORMED) {
            if parse_flag(env_vars::SKIP_MALFORMED, &value)? {
                builder = builder.malformed_policy(MalformedPolicy::Skip);
            }
        }
        if let Some(value) = lookup(env_vars::RECEIVE_TIMEOUT_SECS) {
            builder = builder.receive_timeout(parse_secs(env_vars::RECEIVE_TIMEOUT_SECS, &value)?);
        }
        if let Some(value) = lookup(env_vars::CONNECT_TIMEOUT_SECS) {
            builder = builder.connect_timeout(parse_secs(env_vars::CONNECT_TIMEOUT_SECS, &value)?);
        }

        Ok(builder.build())
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, EspDroError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(EspDroError::Config(format!(
            "{var}: expected a boolean, got `{other}`"
        ))),
    }
}

fn parse_secs(var: &str, value: &str) -> Result<Duration, EspDroError> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| EspDroError::Config(format!("{var}: expected seconds, got `{value}`")))?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| EspDroError::Config(format!("{var}: must be a positive number of seconds")))
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the endpoint address.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Enable or disable the diagnostic echo.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.config.diagnostics = enabled;
        self
    }

    /// Set the malformed-message policy.
    pub fn malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.config.malformed_policy = policy;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the receive timeout.
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.config.receive_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// EspDRO telemetry client.
///
/// Holds the configuration; each call to [`connect`](Self::connect) opens a
/// fresh connection. There is no automatic reconnection.
#[derive(Debug, Clone, Default)]
pub struct EspDroClient {
    config: ClientConfig,
}

impl EspDroClient {
    /// Create a client for the default endpoint.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Create a client for a specific address with otherwise default settings.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::builder().url(url).build())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open the WebSocket connection.
    ///
    /// Fails with [`EspDroError::Connection`] if the endpoint is unreachable
    /// or the handshake fails. No retry is attempted.
    pub async fn connect(&self) -> Result<ReadingStream, EspDroError> {
        let url = validate_url(&self.config.url)?;

        let handshake = connect_async(url.as_str());
        let result = match self.config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, handshake)
                .await
                .map_err(|_| EspDroError::Timeout(limit))?,
            None => handshake.await,
        };
        let (ws_stream, response) = result.map_err(|source| EspDroError::Connection {
            url: url.to_string(),
            source,
        })?;

        tracing::info!(url = %url, status = %response.status(), "Connected to EspDRO");
        Ok(ReadingStream::new(ws_stream, url.to_string(), self.config.clone()))
    }
}

/// Connect to `address` with default settings.
pub async fn connect(address: &str) -> Result<ReadingStream, EspDroError> {
    EspDroClient::with_url(address).connect().await
}

fn validate_url(address: &str) -> Result<Url, EspDroError> {
    let url = Url::parse(address)?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(EspDroError::UnsupportedScheme(other.to_string())),
    }
}
