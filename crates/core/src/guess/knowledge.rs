//! Per-attempt puzzle knowledge.

use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

use super::types::AttemptState;

/// Everything learned about the hidden title during one attempt.
///
/// Reveals are monotonic: a position, once filled, keeps its word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleKnowledge {
    revealed: Vec<Option<String>>,
    tried: HashSet<String>,
    close_words: BTreeSet<String>,
}

impl PuzzleKnowledge {
    /// Fresh knowledge for a title of `title_len` words.
    pub fn new(title_len: usize) -> Self {
        Self {
            revealed: vec![None; title_len],
            ..Default::default()
        }
    }

    pub fn title_len(&self) -> usize {
        self.revealed.len()
    }

    /// Revealed word per position, `None` where still unknown.
    pub fn revealed(&self) -> &[Option<String>] {
        &self.revealed
    }

    pub fn revealed_word(&self, position: usize) -> Option<&str> {
        self.revealed.get(position).and_then(|w| w.as_deref())
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|w| w.is_some()).count()
    }

    /// Every position is revealed.
    pub fn is_found(&self) -> bool {
        self.revealed.iter().all(Option::is_some)
    }

    pub fn state(&self) -> AttemptState {
        if self.is_found() {
            AttemptState::Resolved
        } else if self.revealed_count() > 0 {
            AttemptState::PartiallyRevealed
        } else {
            AttemptState::Unresolved
        }
    }

    pub fn is_unknown(&self, position: usize) -> bool {
        matches!(self.revealed.get(position), Some(None))
    }

    pub fn is_tried(&self, word: &str) -> bool {
        self.tried.contains(word)
    }

    /// Whether `word` already fills some position.
    pub fn is_revealed(&self, word: &str) -> bool {
        self.revealed.iter().flatten().any(|w| w == word)
    }

    /// Record a submitted guess. Returns false if it was already recorded.
    pub fn mark_tried(&mut self, word: &str) -> bool {
        self.tried.insert(word.to_string())
    }

    pub fn tried_count(&self) -> usize {
        self.tried.len()
    }

    /// Guessed words, sorted.
    pub fn tried_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.tried.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }

    pub fn record_close(&mut self, word: &str) {
        self.close_words.insert(word.to_string());
    }

    pub fn close_words(&self) -> &BTreeSet<String> {
        &self.close_words
    }

    /// Fill `positions` with `word`.
    ///
    /// Out-of-range positions are ignored, as is any position already holding
    /// a different word. Returns the number of newly revealed positions.
    pub fn apply_reveal(&mut self, word: &str, positions: &[usize]) -> usize {
        let mut newly = 0;
        for &position in positions {
            let Some(slot) = self.revealed.get_mut(position) else {
                continue;
            };
            match slot {
                None => {
                    *slot = Some(word.to_string());
                    newly += 1;
                    info!(word = word, position = position, "Correct word found");
                }
                Some(existing) if existing.as_str() != word => {
                    warn!(
                        position = position,
                        existing = %existing,
                        reported = word,
                        "Oracle reported a different word for a revealed position; keeping the first"
                    );
                }
                Some(_) => {}
            }
        }
        newly
    }

    /// Title as revealed so far, unknown words shown as underscores.
    pub fn masked_title(&self) -> String {
        self.revealed
            .iter()
            .map(|w| w.clone().unwrap_or_else(|| "_".to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
