//! WebSocket stream implementation.

use std::convert::Infallible;
use std::io::Write;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_util::{Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::console::Console;
use crate::error::EspDroError;
use crate::reading::Reading;
use crate::ws::client::{ClientConfig, MalformedPolicy};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open connection to an EspDRO, yielding readings in arrival order.
///
/// Control frames are answered by tungstenite and never surface here. Once the
/// connection is gone the stream yields a single
/// [`EspDroError::ConnectionClosed`] and then ends.
///
/// # Example
///
/// ```rust,ignore
/// use espdro_client::ws::EspDroClient;
/// use futures_util::StreamExt;
///
/// let mut stream = EspDroClient::new().connect().await?;
/// while let Some(reading) = stream.next().await {
///     println!("{}", reading?.text());
/// }
/// ```
pub struct ReadingStream {
    /// Underlying socket, `None` after close.
    ws: Option<WsStream>,
    /// Address we connected to.
    url: String,
    /// Connection configuration.
    config: ClientConfig,
}

impl std::fmt::Debug for ReadingStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingStream")
            .field("url", &self.url)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl ReadingStream {
    pub(crate) fn new(ws: WsStream, url: String, config: ClientConfig) -> Self {
        Self {
            ws: Some(ws),
            url,
            config,
        }
    }

    /// The address this stream is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The configuration the connection was opened with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check if the connection is open.
    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    /// Wait for the next message.
    ///
    /// This is the loop's only suspension point. Honours the configured
    /// receive timeout, if any.
    pub async fn recv(&mut self) -> Result<Reading, EspDroError> {
        let receive_timeout = self.config.receive_timeout;
        let next = match receive_timeout {
            Some(limit) => tokio::time::timeout(limit, self.next())
                .await
                .map_err(|_| EspDroError::Timeout(limit))?,
            None => self.next().await,
        };

        next.unwrap_or_else(|| {
            Err(EspDroError::ConnectionClosed {
                reason: "connection already closed".into(),
            })
        })
    }

    /// Receive and print readings until the connection fails.
    ///
    /// Never returns `Ok`. Decode failures stop the loop unless the config
    /// says [`MalformedPolicy::Skip`].
    pub async fn run<O: Write, D: Write>(
        &mut self,
        console: &mut Console<O, D>,
    ) -> Result<Infallible, EspDroError> {
        loop {
            let reading = self.recv().await?;
            match console.process(&reading) {
                Ok(_) => {}
                Err(e)
                    if e.is_message_error()
                        && self.config.malformed_policy == MalformedPolicy::Skip =>
                {
                    tracing::warn!(error = %e, message = reading.text(), "Skipping malformed reading");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// [`run`](Self::run) against stdout, with diagnostics on stderr if enabled.
    pub async fn run_stdio(&mut self) -> Result<Infallible, EspDroError> {
        let mut console = Console::stdio(self.config.diagnostics);
        self.run(&mut console).await
    }

    /// Close the connection gracefully.
    pub async fn close(&mut self) -> Result<(), EspDroError> {
        if let Some(mut ws) = self.ws.take() {
            if let Err(e) = ws.close(None).await {
                tracing::debug!("Error while closing WebSocket: {}", e);
            }
        }
        Ok(())
    }
}

impl Stream for ReadingStream {
    type Item = Result<Reading, EspDroError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.as_mut().get_mut();

        loop {
            let Some(ws) = this.ws.as_mut() else {
                return Poll::Ready(None);
            };

            let reason = match ready!(ws.poll_next_unpin(cx)) {
                Some(Ok(WsMessage::Text(text))) => {
                    tracing::debug!(len = text.len(), "Received text message");
                    return Poll::Ready(Some(Ok(Reading::new(text.as_str()))));
                }
                Some(Ok(WsMessage::Binary(data))) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => return Poll::Ready(Some(Ok(Reading::new(text)))),
                    Err(_) => {
                        tracing::warn!(len = data.len(), "Ignoring non-UTF-8 binary message");
                        continue;
                    }
                },
                // Handled automatically by tungstenite
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => continue,
                Some(Ok(WsMessage::Close(frame))) => close_reason(frame.as_ref()),
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error: {}", e);
                    e.to_string()
                }
                None => "stream ended".to_string(),
            };

            this.ws = None;
            tracing::info!(url = %this.url, %reason, "EspDRO connection closed");
            return Poll::Ready(Some(Err(EspDroError::ConnectionClosed { reason })));
        }
    }
}

fn close_reason(frame: Option<&CloseFrame>) -> String {
    match frame {
        Some(frame) if frame.reason.is_empty() => {
            format!("closed by peer (code {})", u16::from(frame.code))
        }
        Some(frame) => format!(
            "closed by peer (code {}): {}",
            u16::from(frame.code),
            frame.reason.as_str()
        ),
        None => "closed by peer".to_string(),
    }
}
