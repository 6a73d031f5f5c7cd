//! Types for the puzzle oracle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Marker prefixed to words the oracle reports as close but not exact.
pub const CLOSE_WORD_MARKER: char = '#';

/// What the puzzle page shows before any guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleState {
    /// Puzzle number, also used to address guesses.
    pub day: u32,
    /// Length of each title word.
    pub title_lengths: Vec<usize>,
    /// Length of each body text word, in reading order.
    pub text_lengths: Vec<usize>,
}

/// Raw guess reply: revealed word -> 0-based title positions.
///
/// Keys starting with [`CLOSE_WORD_MARKER`] are near misses.
pub type GuessReply = BTreeMap<String, Vec<usize>>;

/// A guess reply split into exact reveals and near misses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessFeedback {
    pub reveals: Vec<(String, Vec<usize>)>,
    pub close_words: Vec<String>,
}

/// Split a raw reply into exact reveals and close words (marker stripped).
pub fn parse_reveals(reply: GuessReply) -> GuessFeedback {
    let mut feedback = GuessFeedback::default();
    for (word, positions) in reply {
        match word.strip_prefix(CLOSE_WORD_MARKER) {
            Some(close) => feedback.close_words.push(close.to_string()),
            None => feedback.reveals.push((word, positions)),
        }
    }
    feedback
}

/// Errors that can occur while talking to the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Oracle API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Puzzle page is missing its {0}")]
    MissingLandmark(&'static str),

    #[error("Invalid oracle response: {0}")]
    InvalidResponse(String),

    #[error("No puzzle loaded; fetch the puzzle state before guessing")]
    NoPuzzle,
}

/// The remote scoring service for one puzzle.
///
/// Every `submit_guess` call is one state-changing round trip: the server
/// remembers the guess and reveals every occurrence of the word in the title.
#[async_trait]
pub trait PuzzleOracle: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fetch the current puzzle's number and length profiles.
    async fn puzzle_state(&self) -> Result<PuzzleState, OracleError>;

    /// Submit one word and return every revealed occurrence.
    async fn submit_guess(&self, word: &str) -> Result<GuessReply, OracleError>;
}
