//! # EspDRO Client
//!
//! An async client for the EspDRO digital read-out's WebSocket telemetry feed.
//!
//! The device pushes text messages; those starting with `{` are JSON objects
//! carrying an `axis0` position in micrometers and a `ts` timestamp. Each one
//! is printed as a single console line:
//!
//! ```text
//!   x=1,234,567 time=42
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use espdro_client::ws::connect;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = connect("ws://espdro:81").await?;
//!     match stream.run_stdio().await {
//!         Ok(never) => match never {},
//!         Err(e) => Err(e.into()),
//!     }
//! }
//! ```

pub mod console;
pub mod error;
pub mod format;
pub mod reading;
pub mod ws;

// Re-export commonly used types at crate root
pub use console::Console;
pub use error::EspDroError;
pub use reading::{Reading, StructuredReading};
pub use ws::{ClientConfig, EspDroClient, MalformedPolicy, ReadingStream};

/// Result type alias using EspDroError
pub type Result<T> = std::result::Result<T, EspDroError>;
