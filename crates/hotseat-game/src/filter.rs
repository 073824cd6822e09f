//! Think-block filter
//!
//! Small local models interleave a reasoning segment delimited by
//! `<think>`/`</think>` into their output. The filter removes those
//! segments from a chunked stream, where the tags can land anywhere,
//! including split from their partner across chunk boundaries.

const THINK_START: &str = "<think>";
const THINK_END: &str = "</think>";

/// Stateful scanner that suppresses think-block text across chunks.
#[derive(Debug, Default)]
pub struct ThinkFilter {
    in_think_block: bool,
}

impl ThinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk; returns the visible portion, or `None` when the
    /// chunk is entirely suppressed.
    ///
    /// A start tag anywhere in the chunk enters the suppressed state before
    /// the end-tag check runs, so a chunk carrying both tags still resolves
    /// to the text after the last end tag. One suppress/resume toggle per
    /// chunk.
    pub fn feed(&mut self, chunk: &str) -> Option<String> {
        let mut content = chunk;

        if content.contains(THINK_START) {
            self.in_think_block = true;
        }
        if self.in_think_block {
            match content.rfind(THINK_END) {
                Some(at) => {
                    self.in_think_block = false;
                    content = &content[at + THINK_END.len()..];
                }
                None => return None,
            }
            if content.is_empty() {
                return None;
            }
        }

        Some(content.to_string())
    }
}
