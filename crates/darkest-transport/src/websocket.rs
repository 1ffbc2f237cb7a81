//! WebSocket client connection using `tokio-tungstenite`.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, Fragment, TransportError};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A client WebSocket connection to the chat server.
///
/// The socket is split into its read and write halves, each behind its
/// own lock, so the receive loop can sit in `recv` while the send loop
/// keeps writing.
pub struct WebSocketConnection {
    writer: Mutex<SplitSink<WsStream, Message>>,
    reader: Mutex<SplitStream<WsStream>>,
    open: AtomicBool,
}

impl WebSocketConnection {
    /// Connects to the given `ws://` or `wss://` URL.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::info!(url, "WebSocket connected");

        let (writer, reader) = ws.split();
        Ok(Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
            open: AtomicBool::new(true),
        })
    }

    fn mark_closed(&self) {
        self.open.store(false, Ordering::Release);
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, text: &str) -> Result<(), Self::Error> {
        if !self.is_open() {
            return Err(TransportError::ConnectionClosed(
                "send after close".into(),
            ));
        }
        let msg = Message::Text(text.to_owned().into());
        self.writer.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Fragment>, Self::Error> {
        loop {
            let msg = self.reader.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(Fragment::complete(text.as_bytes())));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(Fragment::complete(data)));
                }
                Some(Ok(Message::Frame(frame))) => {
                    let end_of_message = frame.header().is_final;
                    return Ok(Some(Fragment {
                        data: frame.into_payload().into(),
                        end_of_message,
                    }));
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("server closed the WebSocket");
                    return Ok(None);
                }
                Some(Ok(_)) => continue, // ping/pong
                Some(Err(e)) => {
                    self.mark_closed();
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.mark_closed();
        self.writer.lock().await.close().await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}
