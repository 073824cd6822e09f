//! Ollama chat API backend
//!
//! Talks to the local Ollama daemon's `/api/chat` endpoint, which streams
//! newline-delimited JSON objects until a final `"done": true` record.

use async_stream::stream;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use super::{ChunkProvider, ChunkStream};
use crate::{
    error::{Error, Result},
    types::{ChatContext, ChatOptions},
};

/// Default Ollama base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama API client
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaProvider {
    /// Create a provider against a specific base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn build_request(
        &self,
        model: &str,
        context: &ChatContext,
        options: &ChatOptions,
    ) -> OllamaRequest {
        let mut messages = Vec::new();

        if let Some(ref system_prompt) = context.system_prompt {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system_prompt.clone(),
            });
        }

        for message in &context.messages {
            messages.push(OllamaMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            });
        }

        OllamaRequest {
            model: model.to_string(),
            messages,
            stream: true,
            options: options.clone(),
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl ChunkProvider for OllamaProvider {
    async fn stream(
        &self,
        model: &str,
        context: &ChatContext,
        options: &ChatOptions,
    ) -> Result<ChunkStream> {
        let request = self.build_request(model, context, options);
        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!(model, messages = request.messages.len(), "opening chat stream");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::api(status, text));
        }

        Ok(Box::pin(create_stream(Box::pin(response.bytes_stream()))))
    }
}

fn create_stream(
    mut bytes: impl Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin,
) -> impl futures::Stream<Item = Result<String>> {
    stream! {
        let mut buffer = String::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(Error::Http(e));
                    return;
                }
            };
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Emit every complete NDJSON line; keep the remainder buffered.
            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim().to_string();
                buffer.drain(..=newline);
                if line.is_empty() {
                    continue;
                }

                match serde_json::from_str::<OllamaChunk>(&line) {
                    Ok(parsed) => {
                        if let Some(message) = parsed.error {
                            yield Err(Error::Backend(message));
                            return;
                        }
                        if let Some(message) = parsed.message {
                            if !message.content.is_empty() {
                                yield Ok(message.content);
                            }
                        }
                        if parsed.done {
                            return;
                        }
                    }
                    Err(e) => {
                        yield Err(Error::Json(e));
                        return;
                    }
                }
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChunk {
    #[serde(default)]
    message: Option<OllamaDelta>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaDelta {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use futures::StreamExt;

    fn byte_stream(
        parts: Vec<&'static str>,
    ) -> impl Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin {
        futures::stream::iter(parts.into_iter().map(|p| Ok(bytes::Bytes::from(p))))
    }

    async fn collect(parts: Vec<&'static str>) -> Vec<Result<String>> {
        create_stream(byte_stream(parts)).collect().await
    }

    #[tokio::test]
    async fn test_parses_ndjson_lines() {
        let parts = vec![
            "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n",
        ];
        let items = collect(parts).await;
        let texts: Vec<&str> = items.iter().map(|r| r.as_deref().unwrap()).collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_reassembles_lines_split_across_reads() {
        let parts = vec![
            "{\"message\":{\"role\":\"assistant\",\"con",
            "tent\":\"Hi\"},\"done\":false}\n{\"done\":true}\n",
        ];
        let items = collect(parts).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_deref().unwrap(), "Hi");
    }

    #[tokio::test]
    async fn test_stops_at_done_record() {
        let parts = vec![
            "{\"message\":{\"role\":\"assistant\",\"content\":\"a\"},\"done\":true}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"never\"},\"done\":false}\n",
        ];
        let items = collect(parts).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_deref().unwrap(), "a");
    }

    #[tokio::test]
    async fn test_backend_error_record() {
        let parts = vec!["{\"error\":\"model not found\"}\n"];
        let items = collect(parts).await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::Backend(ref m)) if m == "model not found"));
    }

    #[tokio::test]
    async fn test_malformed_line_yields_json_error() {
        let parts = vec!["not json\n"];
        let items = collect(parts).await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::Json(_))));
    }

    #[test]
    fn test_request_places_system_prompt_first() {
        let provider = OllamaProvider::default();
        let mut context = ChatContext::with_system("host the show");
        context.push(ChatMessage::user("hello"));

        let request = provider.build_request("qwen3:1.7b", &context, &ChatOptions::default());
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.stream);
    }
}
