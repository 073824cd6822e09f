//! Outcome-marker scanner
//!
//! The host is instructed to emit exactly one of two bracketed verdict
//! tokens when judging an answer. The scanner watches the accumulated
//! visible text for the first of them and then meters a trailing character
//! budget, after which the producer force-terminates the stream. The budget
//! is a safety valve: local models will otherwise keep talking long past
//! the semantic decision point.

/// Token marking a judged-correct answer
pub const CORRECT_MARKER: &str = "[CORRECT]";
/// Token marking a judged-wrong answer
pub const WRONG_MARKER: &str = "[WRONG]";
/// Characters allowed after the first marker before the stream is cut
pub const MARKER_TAIL_BUDGET: usize = 400;

/// Tracks the first marker sighting in an accumulating text.
#[derive(Debug, Default)]
pub struct MarkerScanner {
    found_at: Option<usize>,
}

impl MarkerScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the accumulated text. The first call that sees either marker
    /// records the accumulated length; later sightings are ignored.
    pub fn scan(&mut self, accumulated: &str) {
        if self.found_at.is_none()
            && (accumulated.contains(CORRECT_MARKER) || accumulated.contains(WRONG_MARKER))
        {
            self.found_at = Some(accumulated.chars().count());
        }
    }

    /// Accumulated length at the moment of first detection, if any
    pub fn found_at(&self) -> Option<usize> {
        self.found_at
    }

    /// Whether the text has grown more than `budget` chars past the
    /// detection point
    pub fn budget_exceeded(&self, accumulated: &str, budget: usize) -> bool {
        match self.found_at {
            Some(at) => accumulated.chars().count().saturating_sub(at) > budget,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marker_records_nothing() {
        let mut scanner = MarkerScanner::new();
        scanner.scan("What a great answer attempt!");
        assert_eq!(scanner.found_at(), None);
        assert!(!scanner.budget_exceeded("x".repeat(1000).as_str(), MARKER_TAIL_BUDGET));
    }

    #[test]
    fn test_records_length_at_first_detection() {
        let mut scanner = MarkerScanner::new();
        scanner.scan("Nice try");
        assert_eq!(scanner.found_at(), None);
        scanner.scan("Nice try! [WRONG]");
        assert_eq!(scanner.found_at(), Some(17));
    }

    #[test]
    fn test_first_detection_wins() {
        // The marker that enters the accumulated text first fixes the
        // offset; a later sighting of the other marker changes nothing.
        let mut scanner = MarkerScanner::new();
        scanner.scan("[WRONG]");
        assert_eq!(scanner.found_at(), Some(7));
        scanner.scan("[WRONG] but wait, actually [CORRECT]");
        assert_eq!(scanner.found_at(), Some(7));
    }

    #[test]
    fn test_budget_boundary() {
        let mut scanner = MarkerScanner::new();
        let base = "Right you are! [CORRECT]".to_string();
        scanner.scan(&base);
        let at = scanner.found_at().unwrap();

        let exactly = format!("{}{}", base, "x".repeat(MARKER_TAIL_BUDGET));
        assert_eq!(exactly.chars().count(), at + MARKER_TAIL_BUDGET);
        assert!(!scanner.budget_exceeded(&exactly, MARKER_TAIL_BUDGET));

        let over = format!("{exactly}x");
        assert!(scanner.budget_exceeded(&over, MARKER_TAIL_BUDGET));
    }

    #[test]
    fn test_marker_detected_mid_accumulation() {
        let mut scanner = MarkerScanner::new();
        scanner.scan("Drum roll...");
        scanner.scan("Drum roll... [CO");
        assert_eq!(scanner.found_at(), None);
        scanner.scan("Drum roll... [CORRECT] amazing");
        assert_eq!(scanner.found_at(), Some(30));
    }
}
