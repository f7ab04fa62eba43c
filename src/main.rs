//! `espdro` - print EspDRO position readings to the console.
//!
//! Configuration comes from the environment (or a `.env` file):
//!
//! - `ESPDRO_URL` (default `ws://espdro:81`)
//! - `ESPDRO_DIAGNOSTICS` echo raw messages to stderr
//! - `ESPDRO_SKIP_MALFORMED` keep going after an undecodable message
//! - `ESPDRO_RECEIVE_TIMEOUT_SECS`, `ESPDRO_CONNECT_TIMEOUT_SECS`
//! - `RUST_LOG` log filter, e.g. `RUST_LOG=espdro_client=debug`

use std::process::ExitCode;

use espdro_client::{ClientConfig, EspDroClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> espdro_client::Result<()> {
    let config = ClientConfig::from_env()?;
    let mut stream = EspDroClient::with_config(config).connect().await?;

    let outcome = tokio::select! {
        result = stream.run_stdio() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(never)) => match never {},
        Some(Err(e)) => Err(e),
        None => {
            tracing::info!("Interrupted, closing connection");
            stream.close().await
        }
    }
}
