//! SSE client for the chat endpoint

use anyhow::{Context as _, Result};
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use hotseat_game::{ChatRequest, StreamEvent, TranscriptCollector};

/// One in-flight chat stream. Collects the full response text as events
/// arrive so the caller can classify it once the stream ends.
pub struct ChatStream {
    source: EventSource,
    collector: TranscriptCollector,
}

impl ChatStream {
    /// Open a streaming chat request against the server.
    pub fn open(client: &reqwest::Client, base_url: &str, request: &ChatRequest) -> Result<Self> {
        let builder = client.post(format!("{base_url}/api/chat")).json(request);
        let source = EventSource::new(builder).context("failed to create event source")?;
        Ok(Self {
            source,
            collector: TranscriptCollector::new(),
        })
    }

    /// Next decoded event, in arrival order. Payloads that parse as neither
    /// wire shape are skipped. Returns `None` once the stream is over; the
    /// terminal `Done` is delivered first.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        if self.collector.is_done() {
            return Ok(None);
        }

        while let Some(event) = self.source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    let Some(decoded) = StreamEvent::decode_sse_data(&message.data) else {
                        continue;
                    };
                    self.collector.apply(&decoded);
                    if decoded.is_terminal() {
                        self.source.close();
                    }
                    return Ok(Some(decoded));
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(e) => {
                    self.source.close();
                    return Err(e).context("chat stream failed");
                }
            }
        }

        self.source.close();
        Ok(None)
    }

    /// The response text assembled so far.
    pub fn text(&self) -> &str {
        self.collector.text()
    }
}
