//! Normalized stream events and their SSE wire encoding

use serde::Deserialize;
use std::pin::Pin;
use tokio_stream::Stream;

/// Literal terminator payload closing every stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Events emitted by the stream interpreter. A stream carries any number of
/// `Content` events, at most one `Error`, and ends with exactly one `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A fragment of visible response text
    Content(String),
    /// A user-facing diagnostic; the stream still ends with `Done`
    Error(String),
    /// Terminal event; nothing follows it
    Done,
}

impl StreamEvent {
    /// Check if this is the terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }

    /// Encode as the `data:` payload of a server-sent event
    pub fn encode_sse_data(&self) -> String {
        match self {
            StreamEvent::Content(text) => serde_json::json!({ "content": text }).to_string(),
            StreamEvent::Error(message) => serde_json::json!({ "error": message }).to_string(),
            StreamEvent::Done => DONE_SENTINEL.to_string(),
        }
    }

    /// Decode a `data:` payload back into an event. Returns `None` for
    /// payloads that parse as neither shape; consumers skip those rather
    /// than abort the stream.
    pub fn decode_sse_data(data: &str) -> Option<Self> {
        let data = data.trim();
        if data == DONE_SENTINEL {
            return Some(StreamEvent::Done);
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Payload {
            Content { content: String },
            Error { error: String },
        }

        match serde_json::from_str::<Payload>(data).ok()? {
            Payload::Content { content } => Some(StreamEvent::Content(content)),
            Payload::Error { error } => Some(StreamEvent::Error(error)),
        }
    }
}

/// A stream of normalized events
pub type StreamEventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;
