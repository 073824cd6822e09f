//! Consumer-side transcript assembly and outcome classification

use crate::events::StreamEvent;
use crate::marker::{CORRECT_MARKER, WRONG_MARKER};

/// A judged answer outcome. Classification is total: every reaction turn
/// resolves to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
}

/// Reassembles the full response text from a stream of events.
///
/// `Error` payloads are folded into the visible text alongside `Content`,
/// so a backend diagnostic shows up in the transcript like any host line.
/// Events arriving after `Done` are ignored.
#[derive(Debug, Default)]
pub struct TranscriptCollector {
    text: String,
    done: bool,
}

impl TranscriptCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event in arrival order.
    pub fn apply(&mut self, event: &StreamEvent) {
        if self.done {
            return;
        }
        match event {
            StreamEvent::Content(text) | StreamEvent::Error(text) => self.text.push_str(text),
            StreamEvent::Done => self.done = true,
        }
    }

    /// The text assembled so far; valid for live display mid-stream.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the terminal event has been observed.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Classify a completed reaction-turn response.
///
/// Exact markers first (correct wins if the model emitted both). When no
/// marker made it into the text, fall back to generic affirmative keywords,
/// and default to wrong otherwise so the game always moves forward.
pub fn classify_reaction(full_text: &str) -> Outcome {
    let upper = full_text.to_uppercase();

    if upper.contains(CORRECT_MARKER) {
        return Outcome::Correct;
    }
    if upper.contains(WRONG_MARKER) {
        return Outcome::Wrong;
    }

    if upper.contains("CORRECT") || upper.contains("RIGHT!") {
        Outcome::Correct
    } else {
        Outcome::Wrong
    }
}
