//! Degenerate-repetition detector
//!
//! Guards against two failure modes of small local models: literal token
//! loops, and stage-direction spam (`[PAUSE] [PAUSE] ...`). Both checks are
//! purely textual; no model access involved.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Texts shorter than this are never flagged
const MIN_TEXT_LEN: usize = 60;
/// Only the trailing window is scanned for literal loops
const TAIL_WINDOW: usize = 80;
/// Candidate loop pattern lengths, inclusive
const MIN_PATTERN_LEN: usize = 3;
const MAX_PATTERN_LEN: usize = 25;
/// Consecutive repetitions needed to flag a loop
const MIN_REPEATS: usize = 3;

/// Bracketed stage directions, optionally wrapped in emphasis markers,
/// e.g. `[PAUSE]`, `**[DRAMATIC GASP]**`.
static STAGE_DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*?\*?\[[\w\s.!]+\]\*?\*?").unwrap());

/// Check whether the accumulated text looks stuck in a degenerate loop.
pub fn is_repeating(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < MIN_TEXT_LEN {
        return false;
    }

    // Literal loops: does some trailing pattern of 3..=25 chars repeat at
    // least 3 times back-to-back at the end of the window?
    let tail = &chars[chars.len() - TAIL_WINDOW.min(chars.len())..];
    for len in MIN_PATTERN_LEN..=MAX_PATTERN_LEN {
        if len > tail.len() {
            break;
        }
        let pattern = &tail[tail.len() - len..];
        let mut count = 0;
        let mut pos = tail.len();
        while pos >= len && tail[pos - len..pos] == *pattern {
            count += 1;
            pos -= len;
        }
        if count >= MIN_REPEATS {
            return true;
        }
    }

    // Stage-direction spam: 3+ bracketed tokens overall whose latest few
    // normalize down to almost nothing unique.
    let directions: Vec<&str> = STAGE_DIRECTION.find_iter(text).map(|m| m.as_str()).collect();
    if directions.len() >= MIN_REPEATS {
        let last5 = &directions[directions.len().saturating_sub(5)..];
        let unique: HashSet<String> = last5
            .iter()
            .map(|s| s.replace('*', "").to_lowercase())
            .collect();
        if unique.len() <= 2 {
            return true;
        }
    }

    false
}
