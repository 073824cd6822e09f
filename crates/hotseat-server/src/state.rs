//! Shared server state

use std::sync::Arc;

use hotseat_ai::ChunkProvider;
use hotseat_game::InterpreterConfig;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Model backend used by the interpreter
    pub provider: Arc<dyn ChunkProvider>,
    /// Interpreter settings (model id, history window, tail budget)
    pub config: InterpreterConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn ChunkProvider>, config: InterpreterConfig) -> Self {
        Self { provider, config }
    }
}
