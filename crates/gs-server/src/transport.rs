use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use gs_fabric::{FabricError, FabricResult, Transport};
use gs_types::Fingerprint;

/// Pushes each key to a browser as a WebSocket text frame.
///
/// Holds only the write half; the read half stays with the session so it
/// can notice the client leaving.
pub struct WsTransport {
    sink: SplitSink<WebSocket, Message>,
}

impl WsTransport {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn deliver(&mut self, key: &Fingerprint) -> FabricResult<()> {
        self.sink
            .send(Message::Text(key.to_hex()))
            .await
            .map_err(|e| FabricError::Transport(e.to_string()))
    }
}
