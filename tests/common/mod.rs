//! In-process stand-in for an EspDRO WebSocket endpoint.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use espdro_client::Console;

/// How the mock ends the session after sending its script.
#[derive(Debug, Clone, Copy)]
pub enum Ending {
    /// Send a close frame with reason "bye".
    Close,
    /// Drop the socket without a closing handshake.
    Drop,
    /// Keep the connection open until the client leaves.
    Hold,
}

/// Start a server that accepts one client, sends `script` in order and then
/// ends the session. Returns the `ws://` address to connect to.
pub async fn serve(script: Vec<Message>, ending: Ending) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = accept_async(stream).await else {
            return;
        };

        for msg in script {
            if ws.send(msg).await.is_err() {
                return;
            }
        }

        match ending {
            Ending::Close => {
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: "bye".into(),
                };
                let _ = ws.close(Some(frame)).await;
                while let Some(Ok(_)) = ws.next().await {}
            }
            Ending::Drop => drop(ws),
            Ending::Hold => while let Some(Ok(_)) = ws.next().await {},
        }
    });

    format!("ws://{addr}")
}

/// Text frames from string slices.
pub fn texts(messages: &[&str]) -> Vec<Message> {
    messages.iter().map(|m| Message::text(m.to_string())).collect()
}

/// A console writing into memory.
pub fn memory_console(diagnostics: bool) -> Console<Vec<u8>, Vec<u8>> {
    Console::new(Vec::new(), Vec::new(), diagnostics)
}

/// Captured output as a string.
pub fn output(buf: &[u8]) -> String {
    String::from_utf8(buf.to_vec()).unwrap()
}
