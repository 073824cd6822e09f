//! Game progression state machine
//!
//! All game-state mutation funnels through [`transition`], a pure function
//! from state and event to the next state. UI layers hold the current value
//! and replace it wholesale; nothing patches fields from the outside.

use hotseat_ai::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::consumer::Outcome;
use crate::questions::Question;

/// Seconds on the clock for each question
pub const TIMER_DURATION: u32 = 60;
/// Correct answers needed to win
pub const WIN_THRESHOLD: u32 = 8;
/// Rounds available before the game is lost
pub const MAX_ROUNDS: u32 = 8;

/// Linear game phases; no backward movement except a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Welcome,
    Hype,
    Playing,
    Result,
}

/// Final game outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Lose,
}

/// What kind of response a stream was asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// The host is asking a new question; no judgement expected
    Question,
    /// The host is judging the player's previous answer
    Reaction,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub phase: GamePhase,
    pub player_name: String,
    pub score: u32,
    pub round: u32,
    pub messages: Vec<ChatMessage>,
    pub timer_seconds: u32,
    pub is_timer_running: bool,
    pub is_streaming: bool,
    pub is_waiting_for_next: bool,
    pub result: Option<GameResult>,
    pub current_question: Option<Question>,
    pub asked_questions: Vec<usize>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Welcome,
            player_name: String::new(),
            score: 0,
            round: 1,
            messages: vec![],
            timer_seconds: TIMER_DURATION,
            is_timer_running: false,
            is_streaming: false,
            is_waiting_for_next: false,
            result: None,
            current_question: None,
            asked_questions: vec![],
        }
    }
}

/// Events that drive the state machine: UI intents, stream lifecycle, and
/// the once-per-second timer tick.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Player entered their name
    Start { player_name: String },
    /// Hype screen finished; the first question was drawn
    Begin { question: Question, index: usize },
    /// Player submitted an answer
    SubmitAnswer { content: String },
    /// A response stream opened
    StreamOpened,
    /// A fragment of visible response text arrived
    StreamDelta { text: String },
    /// The stream ended; reactions carry their classification
    StreamClosed {
        kind: PromptKind,
        outcome: Option<Outcome>,
    },
    /// The stream broke before delivering a usable response; no evaluation,
    /// no timer restart, the player may retry
    StreamFailed,
    /// Player advanced to the next drawn question
    NextQuestion { question: Question, index: usize },
    /// One second elapsed
    Tick,
    /// Full reinitialization
    Reset,
}

/// Apply one event, producing the next state. Unmatched combinations leave
/// the state unchanged.
pub fn transition(state: GameState, event: GameEvent) -> GameState {
    let mut next = state;

    match event {
        GameEvent::Start { player_name } if next.phase == GamePhase::Welcome => {
            next.player_name = player_name;
            next.phase = GamePhase::Hype;
        }

        GameEvent::Begin { question, index } if next.phase == GamePhase::Hype => {
            next.phase = GamePhase::Playing;
            next.messages.clear();
            next.current_question = Some(question);
            next.asked_questions = vec![index];
            // The timer stays armed but paused until the question finishes
            // streaming.
            next.is_timer_running = false;
            next.timer_seconds = TIMER_DURATION;
        }

        GameEvent::SubmitAnswer { content }
            if next.phase == GamePhase::Playing && !next.is_streaming =>
        {
            next.messages.push(ChatMessage::user(content));
            next.is_timer_running = false;
        }

        GameEvent::StreamOpened if next.phase == GamePhase::Playing => {
            next.is_streaming = true;
            next.is_waiting_for_next = false;
            next.is_timer_running = false;
            next.messages.push(ChatMessage::assistant(""));
        }

        GameEvent::StreamDelta { text } if next.is_streaming => {
            if let Some(last) = next.messages.last_mut() {
                if last.role == hotseat_ai::Role::Assistant {
                    last.content.push_str(&text);
                }
            }
        }

        GameEvent::StreamClosed { kind, outcome } if next.is_streaming => {
            next.is_streaming = false;
            match kind {
                PromptKind::Question => {
                    next.is_timer_running = true;
                    next.timer_seconds = TIMER_DURATION;
                }
                PromptKind::Reaction => {
                    if outcome == Some(Outcome::Correct) {
                        next.score += 1;
                    }
                    next.round += 1;
                    // Win takes precedence: hitting the score threshold on
                    // the final round still wins.
                    if next.score >= WIN_THRESHOLD {
                        next.phase = GamePhase::Result;
                        next.result = Some(GameResult::Win);
                        next.is_timer_running = false;
                    } else if next.round > MAX_ROUNDS {
                        next.phase = GamePhase::Result;
                        next.result = Some(GameResult::Lose);
                        next.is_timer_running = false;
                    } else {
                        next.is_waiting_for_next = true;
                        next.is_timer_running = false;
                    }
                }
            }
        }

        GameEvent::StreamFailed if next.is_streaming => {
            next.is_streaming = false;
        }

        GameEvent::NextQuestion { question, index } if next.is_waiting_for_next => {
            next.messages.clear();
            next.current_question = Some(question);
            next.asked_questions.push(index);
            next.is_waiting_for_next = false;
        }

        GameEvent::Tick if next.is_timer_running => {
            next.timer_seconds = next.timer_seconds.saturating_sub(1);
            if next.timer_seconds == 0 && !next.is_streaming {
                next.phase = GamePhase::Result;
                next.result = Some(GameResult::Lose);
                next.is_timer_running = false;
            }
        }

        GameEvent::Reset => {
            next = GameState::default();
        }

        _ => {}
    }

    next
}
