//! Prompt builders for the game-show host persona
//!
//! Pure functions from game context to prompt text. The system prompt is a
//! correctness dependency of the marker scanner: it instructs the model to
//! emit exactly one of the two verdict tokens when judging an answer.

use crate::marker::{CORRECT_MARKER, WRONG_MARKER};
use crate::questions::Question;
use crate::state::WIN_THRESHOLD;

/// System prompt establishing the host persona and the marker protocol.
pub fn build_system_prompt(player_name: &str, round: u32, score: u32, time_left: u32) -> String {
    let urgency = if time_left > 0 && time_left <= 10 {
        format!("\nURGENT: Only {time_left}s left! Tell {player_name} to HURRY in your question!")
    } else {
        String::new()
    };
    let match_point = if score == WIN_THRESHOLD - 1 {
        "\nMATCH POINT! One more correct to win!"
    } else {
        ""
    };

    format!(
        "You are BUZZY, an energetic and funny game show host for \"HOT SEAT\", a live AI \
         trivia night! You are playing with {player_name}.\n\
         \n\
         RULES:\n\
         - Be energetic, use CAPS for hype, and emojis 🎯💥🏆🔥\n\
         - NEVER use stage directions like [SNEER], [THUMP], [PAUSE], [DRAMATIC], etc.\n\
         - NEVER use markdown formatting like ** or * or # symbols\n\
         - Keep responses SHORT: under 150 words\n\
         - Write in plain text only\n\
         \n\
         GAME: Question {round} | Score: {score}/{WIN_THRESHOLD} | Need {WIN_THRESHOLD} correct to win\n\
         \n\
         EVALUATING AN ANSWER (If user just answered):\n\
         - Give a brief fun reaction saying if they got it right or wrong.\n\
         - Output EXACTLY ONE of these markers on its own line:\n\
         \x20 {CORRECT_MARKER}\n\
         \x20 {WRONG_MARKER}\n\
         - Do NOT ask another question! Just evaluate and STOP.\n\
         \n\
         ASKING A QUESTION (If starting a new round):\n\
         - NEVER use introductory phrases (no \"Here is your next question\", \"Let's move on\").\n\
         - State the question IMMEDIATELY.\n\
         - Do NOT include {CORRECT_MARKER} or {WRONG_MARKER} when asking questions\n\
         - CRITICAL: NEVER reveal the answer or give hints in your question! Only ask the question.\n\
         {urgency}{match_point}"
    )
}

/// Opening prompt for the very first question of a game.
pub fn first_question_prompt(player_name: &str) -> String {
    format!(
        "The game is starting NOW! {player_name} is ready to play HOT SEAT!\n\
         Give them an epic welcome and ask the FIRST question. Make it DRAMATIC and HYPE! 🔥"
    )
}

/// Prompt issued when the player advances to the next question.
pub fn next_question_prompt(round: u32, score: u32) -> String {
    format!(
        "[SYSTEM COMMAND]: The user's previous answer was evaluated. Please immediately ask \
         Question {round} for the user. Current score is {score}/{WIN_THRESHOLD}. Start with \
         the question text instantly. Do not say anything else."
    )
}

/// Append the drawn question (and its options, when present) to a prompt.
pub fn format_question(prompt: &str, question: &Question) -> String {
    match &question.options {
        Some(options) => format!(
            "{prompt}\n\nQuestion: {}\nOptions: {}",
            question.text,
            options.join(", ")
        ),
        None => format!("{prompt}\n\nQuestion: {}", question.text),
    }
}

/// Banner lines shown on the welcome screen.
pub const WELCOME_MESSAGES: [&str; 4] = [
    "🎬 Welcome to HOT SEAT! 🧠💥",
    "Live AI trivia, hosted by BUZZY.",
    "60 seconds per question. 8 correct to WIN.",
    "Think you've got what it takes? 🔥",
];
