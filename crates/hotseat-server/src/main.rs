//! hotseat-server - SSE producer endpoint for the LLM game host

mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use hotseat_ai::providers::ollama::{DEFAULT_BASE_URL, OllamaProvider};
use hotseat_game::InterpreterConfig;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "hotseat-server")]
#[command(about = "Streams the LLM trivia host over server-sent events")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Base URL of the Ollama backend
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    ollama_url: String,

    /// Model identifier to run
    #[arg(long, default_value = "qwen3:1.7b")]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hotseat_server=info".parse()?),
        )
        .init();

    let args = Args::parse();

    info!(ollama_url = %args.ollama_url, model = %args.model, "starting hotseat-server");

    let provider = OllamaProvider::new(&args.ollama_url);
    let config = InterpreterConfig {
        model: args.model,
        ..Default::default()
    };
    let state = AppState::new(Arc::new(provider), config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", routes::api_router())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
