//! Multi-winner sequencer
//!
//! Draws up to `numberOfWinners` winners from one entry list without repeats.
//! Exclusion is by value: once "Bob" wins, every "Bob" line leaves the wheel.
//! The sequence therefore ends early when the distinct values run out.

use crate::entries::{distinct_count, exclude};

/// Winners drawn so far in one wheel session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerSequencer {
    original: Vec<String>,
    winners: Vec<String>,
    remaining: usize,
}

impl WinnerSequencer {
    pub fn new(entries: Vec<String>, number_of_winners: usize) -> Self {
        let available = distinct_count(&entries);
        let remaining = number_of_winners.min(available);
        if remaining < number_of_winners {
            log::info!(
                "{} winners requested but only {} distinct entries, capping",
                number_of_winners,
                available
            );
        }
        Self {
            original: entries,
            winners: Vec::new(),
            remaining,
        }
    }

    pub fn original(&self) -> &[String] {
        &self.original
    }

    pub fn winners(&self) -> &[String] {
        &self.winners
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// No more spins will be run
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Entries still eligible for the next spin
    pub fn active_entries(&self) -> Vec<String> {
        exclude(&self.original, &self.winners)
    }

    /// Record a resolved winner. Returns false (and records nothing) once the
    /// sequence is complete.
    pub fn record(&mut self, winner: String) -> bool {
        if self.is_complete() {
            return false;
        }
        self.winners.push(winner);
        self.remaining -= 1;

        // By-value exclusion can exhaust the wheel before the count runs out
        if self.remaining > 0 && self.active_entries().is_empty() {
            self.remaining = 0;
        }
        true
    }

    /// The latest winner
    pub fn last_winner(&self) -> Option<&str> {
        self.winners.last().map(String::as_str)
    }

    /// Text for the host to put on the clipboard: the latest winner, or the
    /// whole list (one per line) once a multi-winner sequence is done
    pub fn clipboard_text(&self) -> Option<String> {
        if self.is_complete() && self.winners.len() > 1 {
            Some(self.winners.join("\n"))
        } else {
            self.last_winner().map(str::to_string)
        }
    }

    /// "Copy All": every winner so far, one per line, available from the
    /// second winner on whether or not the draw is finished
    pub fn all_winners_text(&self) -> Option<String> {
        (self.winners.len() > 1).then(|| self.winners.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_caps_to_available_entries() {
        let seq = WinnerSequencer::new(names(&["a", "b", "c"]), 5);
        assert_eq!(seq.remaining(), 3);
    }

    #[test]
    fn test_caps_to_distinct_values() {
        let seq = WinnerSequencer::new(names(&["a", "a", "b"]), 3);
        assert_eq!(seq.remaining(), 2);
    }

    #[test]
    fn test_record_excludes_by_value() {
        let mut seq = WinnerSequencer::new(names(&["Ann", "Bob", "Ann", "Cy"]), 2);
        assert!(seq.record("Ann".into()));
        assert_eq!(seq.active_entries(), names(&["Bob", "Cy"]));
        assert_eq!(seq.remaining(), 1);
        assert!(seq.record("Cy".into()));
        assert!(seq.is_complete());
        assert!(!seq.record("Bob".into()));
        assert_eq!(seq.winners(), names(&["Ann", "Cy"]).as_slice());
    }

    #[test]
    fn test_clipboard_text() {
        let mut seq = WinnerSequencer::new(names(&["a", "b", "c"]), 2);
        assert_eq!(seq.clipboard_text(), None);
        seq.record("b".into());
        assert_eq!(seq.clipboard_text().as_deref(), Some("b"));
        seq.record("c".into());
        assert_eq!(seq.clipboard_text().as_deref(), Some("b\nc"));
    }

    #[test]
    fn test_all_winners_text_mid_sequence() {
        let mut seq = WinnerSequencer::new(names(&["a", "b", "c", "d"]), 3);
        seq.record("d".into());
        assert_eq!(seq.all_winners_text(), None);
        seq.record("a".into());
        assert!(!seq.is_complete());
        assert_eq!(seq.all_winners_text().as_deref(), Some("d\na"));
        // The single-copy text still follows the latest winner
        assert_eq!(seq.clipboard_text().as_deref(), Some("a"));
        seq.record("b".into());
        assert_eq!(seq.all_winners_text().as_deref(), Some("d\na\nb"));
    }

    #[test]
    fn test_single_winner_clipboard() {
        let mut seq = WinnerSequencer::new(names(&["a", "b"]), 1);
        seq.record("a".into());
        assert!(seq.is_complete());
        assert_eq!(seq.clipboard_text().as_deref(), Some("a"));
    }
}
