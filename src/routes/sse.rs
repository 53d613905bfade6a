// Server-sent events: one `data:` event per snapshot push.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use tokio::time::Duration;

use super::AppState;

const SSE_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

pub(super) async fn sse_stats(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let retry = Duration::from_millis(state.config.streaming.retry_hint_ms);
    let events = state
        .hub
        .subscribe("sse")
        .enumerate()
        .map(move |(i, payload)| {
            let event = Event::default().data(payload);
            // Advertise the client's reconnect floor once, with the first push.
            Ok(if i == 0 { event.retry(retry) } else { event })
        });
    Sse::new(events).keep_alive(KeepAlive::new().interval(SSE_KEEP_ALIVE_INTERVAL))
}
