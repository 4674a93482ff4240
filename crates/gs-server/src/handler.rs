use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::SplitStream;
use futures::StreamExt;
use gs_fabric::relay;
use gs_types::Fingerprint;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ServerError, ServerResult};
use crate::router::AppState;
use crate::transport::WsTransport;

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyList {
    pub keys: Vec<Fingerprint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub key: Fingerprint,
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub key: String,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// All keys in submission order.
pub async fn index_handler(State(state): State<AppState>) -> ServerResult<Json<KeyList>> {
    let keys = state.hub.keys().await?;
    Ok(Json(KeyList { keys }))
}

/// Accept a multipart upload, ingest it and return its key.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<(StatusCode, Json<UploadResponse>)> {
    let payload = loop {
        let field = multipart
            .next_field()
            .await?
            .ok_or_else(|| ServerError::BadRequest(format!("missing `{UPLOAD_FIELD}` field")))?;
        if field.name() == Some(UPLOAD_FIELD) {
            break field.bytes().await?;
        }
    };
    let key = state.hub.ingest(payload).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { key })))
}

/// Serve the original GIF, or the PNG still with `thumb=true`.
pub async fn image_handler(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> ServerResult<Response> {
    let key: Fingerprint = query
        .key
        .parse()
        .map_err(|e| ServerError::BadRequest(format!("invalid key: {e}")))?;
    let image = state.hub.image(key).await?;

    let (content_type, body) = if query.thumb.as_deref() == Some("true") {
        ("image/png", image.derived().clone())
    } else {
        ("image/gif", image.original().clone())
    };
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "max-age=3600, public"),
        ],
        body,
    )
        .into_response())
}

/// Upgrade to a WebSocket that receives every newly stored key.
pub async fn stream_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_session(state, socket))
}

async fn stream_session(state: AppState, socket: WebSocket) {
    let (sink, mut incoming) = socket.split();
    let subscription = state.hub.subscribe();
    let id = subscription.id();
    info!(subscriber = %id, "live-update listener connected");

    let mut transport = WsTransport::new(sink);
    let relayed = relay(
        state.hub.broadcaster(),
        subscription,
        &mut transport,
        state.delivery_timeout,
    );

    tokio::select! {
        outcome = relayed => match outcome {
            Ok(delivered) => info!(subscriber = %id, delivered, "live-update stream ended"),
            Err(err) => info!(subscriber = %id, error = %err, "live-update listener gone"),
        },
        () = wait_for_disconnect(&mut incoming) => {
            state.hub.unsubscribe(id);
            info!(subscriber = %id, "live-update listener disconnected");
        }
    }
}

/// Read the client side until it closes or errors.
///
/// Listeners send nothing meaningful, but reading is what lets the socket
/// answer pings and complete the close handshake.
async fn wait_for_disconnect(incoming: &mut SplitStream<WebSocket>) {
    while let Some(Ok(message)) = incoming.next().await {
        if let Message::Close(frame) = message {
            debug!(?frame, "listener sent close");
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> ServerResult<Json<serde_json::Value>> {
    let stats = state.hub.stats().await?;
    Ok(Json(json!({
        "name": "gifstream",
        "version": env!("CARGO_PKG_VERSION"),
        "objects": stats.objects,
        "bytes": stats.bytes,
        "subscribers": stats.subscribers,
    })))
}
