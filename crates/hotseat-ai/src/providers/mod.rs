//! Model backend implementations

pub mod ollama;

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::{ChatContext, ChatOptions, Result};

/// A lazy sequence of raw text fragments from the model, ended by the
/// backend's own stop decision or by an error item.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Trait for streaming model backends
#[async_trait]
pub trait ChunkProvider: Send + Sync {
    /// Stream raw response fragments from the model
    async fn stream(
        &self,
        model: &str,
        context: &ChatContext,
        options: &ChatOptions,
    ) -> Result<ChunkStream>;
}
