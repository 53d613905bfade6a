// WebSocket variant of the stats stream

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::time::{Duration, timeout};

use super::AppState;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_stats(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| async move {
        let payloads = hub.subscribe("websocket");
        if let Err(e) = stream_stats(socket, payloads).await {
            tracing::info!("Stats WebSocket error: {}", e);
        }
    })
}

async fn stream_stats(
    mut socket: WebSocket,
    payloads: impl Stream<Item = String>,
) -> anyhow::Result<()> {
    let mut payloads = std::pin::pin!(payloads);
    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first ping tick fires immediately; skip it so the first frame is a snapshot.
    ping_interval.reset();
    loop {
        tokio::select! {
            payload = payloads.next() => {
                let Some(json) = payload else { break };
                timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into())))
                    .await
                    .map_err(|_| anyhow::anyhow!("snapshot send timed out"))??;
            }
            _ = ping_interval.tick() => {
                timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new())))
                    .await
                    .map_err(|_| anyhow::anyhow!("ping send timed out"))??;
            }
            incoming = socket.recv() => {
                match incoming {
                    None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    Ok(())
}
