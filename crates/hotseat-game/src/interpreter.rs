//! Stream interpreter (producer side)
//!
//! Turns one conversation context into a normalized event stream: invokes
//! the model, strips think-blocks, watches for degenerate repetition and
//! the outcome-marker tail budget, and guarantees a single terminal `Done`
//! no matter how the underlying stream ends.

use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use hotseat_ai::{ChatContext, ChatOptions, ChunkProvider};

use crate::events::{StreamEvent, StreamEventStream};
use crate::filter::ThinkFilter;
use crate::marker::{MARKER_TAIL_BUDGET, MarkerScanner};
use crate::prompts;
use crate::repetition::is_repeating;

/// Fixed user-facing diagnostic for any backend failure
pub const BACKEND_ERROR_MESSAGE: &str =
    "Failed to connect to Ollama. Make sure it is running on localhost:11434";

/// Number of trailing conversation messages forwarded to the model
pub const HISTORY_WINDOW: usize = 6;

/// One streaming request from the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub messages: Vec<hotseat_ai::ChatMessage>,
    pub player_name: String,
    pub round: u32,
    pub score: u32,
    pub time_left: u32,
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self {
            messages: vec![],
            player_name: "Player".to_string(),
            round: 1,
            score: 0,
            time_left: 30,
        }
    }
}

/// Interpreter settings
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Model identifier passed to the backend
    pub model: String,
    /// Generation options
    pub options: ChatOptions,
    /// Conversation window forwarded per turn; older turns are truncated
    pub history_window: usize,
    /// Characters allowed past the first outcome marker
    pub marker_tail_budget: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            model: "qwen3:1.7b".to_string(),
            options: ChatOptions::default(),
            history_window: HISTORY_WINDOW,
            marker_tail_budget: MARKER_TAIL_BUDGET,
        }
    }
}

/// Run one request against the model, producing the normalized event
/// stream. The stream always ends with exactly one `Done`; a backend
/// failure contributes a single `Error` before it. Cancellation stops
/// production silently.
pub fn interpret(
    provider: Arc<dyn ChunkProvider>,
    config: InterpreterConfig,
    request: ChatRequest,
    cancel: CancellationToken,
) -> StreamEventStream {
    Box::pin(stream! {
        let system_prompt = prompts::build_system_prompt(
            &request.player_name,
            request.round,
            request.score,
            request.time_left,
        );

        // Only the most recent turns go to the model; older context confuses
        // small models more than it helps them.
        let start = request.messages.len().saturating_sub(config.history_window);
        let mut context = ChatContext::with_system(system_prompt);
        for message in &request.messages[start..] {
            context.push(message.clone());
        }

        let mut chunks = match provider.stream(&config.model, &context, &config.options).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!("model stream failed to open: {e}");
                yield StreamEvent::Error(BACKEND_ERROR_MESSAGE.to_string());
                yield StreamEvent::Done;
                return;
            }
        };

        let mut filter = ThinkFilter::new();
        let mut scanner = MarkerScanner::new();
        let mut accumulated = String::new();

        while let Some(chunk) = chunks.next().await {
            if cancel.is_cancelled() {
                tracing::debug!("consumer cancelled, closing stream");
                break;
            }

            let raw = match chunk {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("model stream failed mid-response: {e}");
                    yield StreamEvent::Error(BACKEND_ERROR_MESSAGE.to_string());
                    break;
                }
            };

            let Some(visible) = filter.feed(&raw) else {
                continue;
            };

            accumulated.push_str(&visible);
            scanner.scan(&accumulated);

            // A chunk that tips the text into a degenerate loop is dropped
            // along with the rest of the stream.
            if is_repeating(&accumulated) {
                tracing::debug!(len = accumulated.len(), "degenerate repetition, stopping early");
                break;
            }

            yield StreamEvent::Content(visible);

            // The chunk that crosses the tail budget still goes out; the cut
            // lands after it.
            if scanner.budget_exceeded(&accumulated, config.marker_tail_budget) {
                tracing::debug!(
                    found_at = scanner.found_at(),
                    "marker tail budget spent, stopping early"
                );
                break;
            }
        }

        yield StreamEvent::Done;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hotseat_ai::{ChunkStream, Error, Result};
    use std::sync::Mutex;

    /// A provider that replays a scripted chunk sequence and records the
    /// context it was asked to stream.
    struct ScriptedProvider {
        chunks: Mutex<Vec<Result<String>>>,
        seen_context: Mutex<Option<ChatContext>>,
        fail_to_open: bool,
    }

    impl ScriptedProvider {
        fn new(chunks: Vec<&str>) -> Self {
            Self {
                chunks: Mutex::new(chunks.into_iter().map(|c| Ok(c.to_string())).collect()),
                seen_context: Mutex::new(None),
                fail_to_open: false,
            }
        }

        fn with_items(items: Vec<Result<String>>) -> Self {
            Self {
                chunks: Mutex::new(items),
                seen_context: Mutex::new(None),
                fail_to_open: false,
            }
        }

        fn failing() -> Self {
            Self {
                chunks: Mutex::new(vec![]),
                seen_context: Mutex::new(None),
                fail_to_open: true,
            }
        }
    }

    #[async_trait]
    impl ChunkProvider for ScriptedProvider {
        async fn stream(
            &self,
            _model: &str,
            context: &ChatContext,
            _options: &ChatOptions,
        ) -> Result<ChunkStream> {
            *self.seen_context.lock().unwrap() = Some(context.clone());
            if self.fail_to_open {
                return Err(Error::Backend("connection refused".to_string()));
            }
            let items: Vec<Result<String>> = self.chunks.lock().unwrap().drain(..).collect();
            Ok(Box::pin(futures::stream::iter(items)))
        }
    }

    async fn run(provider: ScriptedProvider, request: ChatRequest) -> Vec<StreamEvent> {
        interpret(
            Arc::new(provider),
            InterpreterConfig::default(),
            request,
            CancellationToken::new(),
        )
        .collect()
        .await
    }

    fn visible_text(events: &[StreamEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Content(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn assert_single_trailing_done(events: &[StreamEvent]) {
        assert_eq!(events.last(), Some(&StreamEvent::Done));
        assert_eq!(
            events.iter().filter(|e| **e == StreamEvent::Done).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_plain_chunks_pass_through() {
        let events = run(
            ScriptedProvider::new(vec!["Welcome ", "to the ", "show!"]),
            ChatRequest::default(),
        )
        .await;
        assert_eq!(visible_text(&events), "Welcome to the show!");
        assert_single_trailing_done(&events);
    }

    #[tokio::test]
    async fn test_think_block_split_across_chunks_removed() {
        let events = run(
            ScriptedProvider::new(vec!["<think>let me ", "reason</think>", "Hello!"]),
            ChatRequest::default(),
        )
        .await;
        assert_eq!(visible_text(&events), "Hello!");
        assert_single_trailing_done(&events);
    }

    #[tokio::test]
    async fn test_failure_to_open_yields_error_then_done() {
        let events = run(ScriptedProvider::failing(), ChatRequest::default()).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Error(BACKEND_ERROR_MESSAGE.to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_earlier_content() {
        let events = run(
            ScriptedProvider::with_items(vec![
                Ok("partial ".to_string()),
                Err(Error::Backend("reset".to_string())),
                Ok("never delivered".to_string()),
            ]),
            ChatRequest::default(),
        )
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("partial ".to_string()),
                StreamEvent::Error(BACKEND_ERROR_MESSAGE.to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_repetition_cut_drops_triggering_chunk() {
        let filler = "A long opening line from the host to get past the floor. ";
        let loops = "again and again and again and again and again and ";
        let events = run(
            ScriptedProvider::new(vec![filler, loops, "unreachable"]),
            ChatRequest::default(),
        )
        .await;
        // The chunk that tipped detection is not in the output.
        assert_eq!(visible_text(&events), filler);
        assert_single_trailing_done(&events);
    }

    #[tokio::test]
    async fn test_marker_tail_budget_cut_keeps_crossing_chunk() {
        // 495 varied chars so the budget cut fires without tripping the
        // repetition detector first.
        let tail: String = (0..45).map(|i| format!("part{i:02}word ")).collect();
        assert!(tail.chars().count() > MARKER_TAIL_BUDGET);
        let chunks = vec!["You nailed it! [CORRECT]", tail.as_str(), "after the cut"];
        let events = run(ScriptedProvider::new(chunks), ChatRequest::default()).await;
        // The chunk that crossed the budget is emitted; the next one is not.
        let text = visible_text(&events);
        assert!(text.ends_with(&tail));
        assert!(!text.contains("after the cut"));
        assert_single_trailing_done(&events);
    }

    #[tokio::test]
    async fn test_marker_within_budget_streams_to_completion() {
        let events = run(
            ScriptedProvider::new(vec!["Nope! [WRONG] ", "better luck next time."]),
            ChatRequest::default(),
        )
        .await;
        assert_eq!(visible_text(&events), "Nope! [WRONG] better luck next time.");
        assert_single_trailing_done(&events);
    }

    #[tokio::test]
    async fn test_history_trimmed_to_window() {
        let provider = ScriptedProvider::new(vec!["ok"]);
        let mut request = ChatRequest::default();
        for i in 0..10 {
            request.messages.push(hotseat_ai::ChatMessage::user(format!("turn {i}")));
        }

        let provider = Arc::new(provider);
        let events: Vec<StreamEvent> = interpret(
            provider.clone(),
            InterpreterConfig::default(),
            request,
            CancellationToken::new(),
        )
        .collect()
        .await;
        assert_single_trailing_done(&events);

        let context = provider.seen_context.lock().unwrap().clone().unwrap();
        assert_eq!(context.messages.len(), HISTORY_WINDOW);
        assert_eq!(context.messages[0].content, "turn 4");
        assert_eq!(context.messages.last().unwrap().content, "turn 9");
        assert!(context.system_prompt.is_some());
    }

    #[tokio::test]
    async fn test_cancelled_stream_ends_with_done_only() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let events: Vec<StreamEvent> = interpret(
            Arc::new(ScriptedProvider::new(vec!["never shown"])),
            InterpreterConfig::default(),
            ChatRequest::default(),
            cancel,
        )
        .collect()
        .await;
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn test_request_defaults_from_sparse_json() {
        let request: ChatRequest = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert_eq!(request.player_name, "Player");
        assert_eq!(request.round, 1);
        assert_eq!(request.score, 0);
        assert_eq!(request.time_left, 30);
    }

    #[test]
    fn test_request_camel_case_fields() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hi"}],"playerName":"Ada","timeLeft":12}"#,
        )
        .unwrap();
        assert_eq!(request.player_name, "Ada");
        assert_eq!(request.time_left, 12);
        assert_eq!(request.messages.len(), 1);
    }
}
