//! Realtime transport
//!
//! [`Connector`]/[`Connection`] hide the WebSocket library from the channel
//! loop. [`WsConnector`] is the `tokio-tungstenite` implementation.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::error::RealtimeError;
use super::policy::close_code;

/// What the channel loop sees from a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Closed { code: u16 },
}

#[async_trait]
pub trait Connection: Send {
    /// Next text frame or the closure. Must be cancel-safe.
    async fn next_frame(&mut self) -> Frame;

    /// Close with a normal close code
    async fn close(&mut self);
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, RealtimeError>;
}

pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, RealtimeError> {
        let (stream, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| RealtimeError::Connect(e.to_string()))?;
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn next_frame(&mut self) -> Frame {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Frame::Text(text),
                Some(Ok(Message::Close(frame))) => {
                    let code = frame
                        .map(|f| u16::from(f.code))
                        .unwrap_or(close_code::NO_STATUS);
                    return Frame::Closed { code };
                }
                // ping/pong are answered by tungstenite; binary is not part of the protocol
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!(error = %e, "WebSocket read failed");
                    return Frame::Closed {
                        code: close_code::ABNORMAL,
                    };
                }
                None => {
                    return Frame::Closed {
                        code: close_code::ABNORMAL,
                    };
                }
            }
        }
    }

    async fn close(&mut self) {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "screen closed".into(),
        };
        if let Err(e) = self.stream.close(Some(frame)).await {
            debug!(error = %e, "WebSocket close failed");
        }
    }
}
