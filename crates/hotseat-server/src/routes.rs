//! HTTP route handlers for the game API

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use hotseat_game::{ChatRequest, interpret};

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
}

async fn health() -> &'static str {
    "ok"
}

/// POST /api/chat - stream one host response as server-sent events.
///
/// Each interpreter event becomes one `data:` line; the stream always closes
/// with the `[DONE]` terminator. A client disconnect drops the stream, which
/// stops the interpreter cooperatively.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    debug!(
        round = request.round,
        score = request.score,
        messages = request.messages.len(),
        "chat stream requested"
    );

    let cancel = CancellationToken::new();
    let events = interpret(state.provider.clone(), state.config.clone(), request, cancel);
    let stream =
        events.map(|event| Ok::<_, Infallible>(Event::default().data(event.encode_sse_data())));

    let sse = Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)));
    ([(header::CACHE_CONTROL, "no-cache, no-transform")], sse)
}
