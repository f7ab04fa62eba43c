//! EspDRO WebSocket client.
//!
//! Opens one connection to the device and turns its text messages into
//! [`Reading`](crate::reading::Reading)s.
//!
//! # Example
//!
//! ```rust,no_run
//! use espdro_client::ws::{ClientConfig, EspDroClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .url("ws://espdro:81")
//!         .diagnostics(true)
//!         .build();
//!
//!     let mut stream = EspDroClient::with_config(config).connect().await?;
//!
//!     // Prints "  x=1,234,567 time=42" style lines until the device goes away.
//!     let err = stream.run_stdio().await.unwrap_err();
//!     eprintln!("Stopped: {err}");
//!     Ok(())
//! }
//! ```

mod client;
mod stream;

pub use client::{
    ClientConfig, ClientConfigBuilder, EspDroClient, MalformedPolicy, connect, endpoints, env_vars,
};
pub use stream::ReadingStream;
