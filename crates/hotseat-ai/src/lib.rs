//! hotseat-ai: Chat-model provider abstraction
//!
//! This crate provides the raw token-stream interface to the local model
//! backend. It knows nothing about the game; it turns a conversation context
//! into a lazy sequence of text fragments.

pub mod error;
pub mod providers;
pub mod types;

pub use error::{Error, Result};
pub use providers::{ChunkProvider, ChunkStream};
pub use types::*;
