//! hotseat - play the LLM-hosted trivia game in the terminal

mod client;
mod config;

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;

use hotseat_ai::ChatMessage;
use hotseat_game::state::WIN_THRESHOLD;
use hotseat_game::{
    ChatRequest, GameEvent, GamePhase, GameResult, GameState, PromptKind, StreamEvent,
    classify_reaction, prompts, questions, transition,
};

use crate::client::ChatStream;
use crate::config::Config;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "hotseat")]
#[command(about = "Play the LLM-hosted trivia game in the terminal")]
struct Args {
    /// Server base URL
    #[arg(short, long)]
    server: Option<String>,

    /// Player name (skips the name prompt)
    #[arg(short, long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::load();
    let server_url = args
        .server
        .clone()
        .or(config.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let mut lines = spawn_stdin_reader();
    let client = reqwest::Client::new();

    let mut state = GameState::default();

    'game: loop {
        println!();
        for line in prompts::WELCOME_MESSAGES {
            println!("{line}");
        }
        println!();

        let player_name = match args.name.clone().or_else(|| config.player_name.clone()) {
            Some(name) => name,
            None => {
                print!("Enter your name, challenger: ");
                flush();
                match lines.recv().await {
                    Some(line) if !line.trim().is_empty() => line.trim().to_string(),
                    _ => return Ok(()),
                }
            }
        };

        state = transition(state, GameEvent::Start { player_name });
        println!("\n🔥 GET READY {}! The game is about to BEGIN...\n", state.player_name);
        tokio::time::sleep(Duration::from_secs(2)).await;

        let (question, index) = questions::draw(&[], &mut rand::thread_rng());
        let opening = prompts::format_question(
            &prompts::first_question_prompt(&state.player_name),
            &question,
        );
        state = transition(state, GameEvent::Begin { question, index });
        state = run_stream(
            state,
            &client,
            &server_url,
            vec![ChatMessage::user(opening)],
            PromptKind::Question,
        )
        .await;
        print_clock(&state);

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            match state.phase {
                GamePhase::Result => {
                    print_result(&state);
                    print!("Play again? (y/N): ");
                    flush();
                    let answer = lines.recv().await.unwrap_or_default();
                    if answer.trim().eq_ignore_ascii_case("y") {
                        state = transition(state, GameEvent::Reset);
                        continue 'game;
                    }
                    break 'game;
                }

                GamePhase::Playing if state.is_waiting_for_next => {
                    print!("Press Enter for the next question ➡️  ");
                    flush();
                    if lines.recv().await.is_none() {
                        break 'game;
                    }
                    let (question, index) =
                        questions::draw(&state.asked_questions, &mut rand::thread_rng());
                    let prompt = prompts::format_question(
                        &prompts::next_question_prompt(state.round, state.score),
                        &question,
                    );
                    state = transition(state, GameEvent::NextQuestion { question, index });
                    state = run_stream(
                        state,
                        &client,
                        &server_url,
                        vec![ChatMessage::user(prompt)],
                        PromptKind::Question,
                    )
                    .await;
                    print_clock(&state);
                }

                GamePhase::Playing => {
                    tokio::select! {
                        line = lines.recv() => {
                            let Some(line) = line else { break 'game };
                            let answer = line.trim().to_string();
                            if answer.is_empty() {
                                continue;
                            }
                            state = transition(state, GameEvent::SubmitAnswer { content: answer });
                            let messages = state.messages.clone();
                            state = run_stream(
                                state,
                                &client,
                                &server_url,
                                messages,
                                PromptKind::Reaction,
                            )
                            .await;
                            if state.phase == GamePhase::Playing {
                                println!("🎯 Score: {}/{WIN_THRESHOLD} | Round {}", state.score, state.round);
                            }
                        }
                        _ = ticker.tick() => {
                            state = transition(state, GameEvent::Tick);
                            if state.phase == GamePhase::Result {
                                println!("\n⏰ TIME'S UP!");
                            } else if state.is_timer_running
                                && state.timer_seconds > 0
                                && state.timer_seconds <= 5
                            {
                                println!("⏰ {}s left!", state.timer_seconds);
                            }
                        }
                    }
                }

                _ => break 'game,
            }
        }
    }

    Ok(())
}

/// Open one stream against the server and fold its events into the state.
/// `is_streaming` is cleared by the closing transition on every path; a
/// transport failure closes without evaluation so the player can retry.
async fn run_stream(
    mut state: GameState,
    client: &reqwest::Client,
    server_url: &str,
    request_messages: Vec<ChatMessage>,
    kind: PromptKind,
) -> GameState {
    let request = ChatRequest {
        messages: request_messages,
        player_name: state.player_name.clone(),
        round: state.round,
        score: state.score,
        time_left: state.timer_seconds,
    };

    state = transition(state, GameEvent::StreamOpened);
    println!();

    let full_text = match stream_into_state(&mut state, client, server_url, &request).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("stream failed: {e}");
            let note = "⚠️ Couldn't reach the quiz server. Is hotseat-server running?";
            println!("{note}\n");
            state = transition(state, GameEvent::StreamDelta { text: note.to_string() });
            return transition(state, GameEvent::StreamFailed);
        }
    };
    println!("\n");

    let outcome = match kind {
        PromptKind::Reaction => Some(classify_reaction(&full_text)),
        PromptKind::Question => None,
    };

    transition(state, GameEvent::StreamClosed { kind, outcome })
}

/// Pull events off the wire, rendering and applying each in arrival order.
/// Returns the full assembled response text.
async fn stream_into_state(
    state: &mut GameState,
    client: &reqwest::Client,
    server_url: &str,
    request: &ChatRequest,
) -> Result<String> {
    let mut stream = ChatStream::open(client, server_url, request)?;

    while let Some(event) = stream.next_event().await? {
        match event {
            StreamEvent::Content(text) | StreamEvent::Error(text) => {
                print!("{text}");
                flush();
                *state = transition(state.clone(), GameEvent::StreamDelta { text });
            }
            StreamEvent::Done => break,
        }
    }

    Ok(stream.text().to_string())
}

fn print_clock(state: &GameState) {
    if state.is_timer_running {
        println!("⏱️  {}s on the clock. Type your answer!", state.timer_seconds);
    }
}

fn print_result(state: &GameState) {
    println!();
    match state.result {
        Some(GameResult::Win) => {
            println!("🏆 YOU WIN, {}!", state.player_name);
            println!("🎉 Incredible! You're a HOT SEAT champion!");
        }
        _ => {
            println!("😢 GAME OVER, {}.", state.player_name);
            println!("So close! You'll get it next time, champion! 💪");
        }
    }
    println!("Final score: {}/{WIN_THRESHOLD} correct\n", state.score);
}

/// Forward stdin lines onto a channel so the game loop can select between
/// player input and timer ticks.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn flush() {
    let _ = std::io::stdout().flush();
}
