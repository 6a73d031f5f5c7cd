//! Types for the guess engine.

use serde::Serialize;
use std::fmt;

use super::knowledge::PuzzleKnowledge;

/// Progress of one puzzle attempt.
///
/// `Unresolved -> (PartiallyRevealed)* -> Resolved`, or `Exhausted` when the
/// traversal runs out of candidates first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    Unresolved,
    PartiallyRevealed,
    Resolved,
    Exhausted,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unresolved => "unresolved",
            Self::PartiallyRevealed => "partially revealed",
            Self::Resolved => "resolved",
            Self::Exhausted => "exhausted",
        };
        f.write_str(s)
    }
}

/// Why a candidate was dropped without (further) oracle calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    WordCountMismatch { expected: usize, actual: usize },
    AlreadyResolved,
    LengthMismatch { position: usize },
    AlreadyTried { word: String },
    AlreadyRevealed { word: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordCountMismatch { expected, actual } => {
                write!(f, "expected {} words, candidate has {}", expected, actual)
            }
            Self::AlreadyResolved => f.write_str("title already resolved"),
            Self::LengthMismatch { position } => {
                write!(f, "word length differs at position {}", position)
            }
            Self::AlreadyTried { word } => write!(f, "'{}' was already guessed", word),
            Self::AlreadyRevealed { word } => write!(f, "'{}' is already revealed", word),
        }
    }
}

/// Result of attempting one candidate title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Every title position is now revealed.
    Found,
    /// All of the candidate's unknown words were guessed; title still incomplete.
    Unresolved,
    /// The candidate was abandoned before or between guesses.
    Skipped(SkipReason),
}

impl AttemptOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found)
    }
}

/// Final report of a puzzle attempt.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// `Resolved` or `Exhausted`.
    pub state: AttemptState,
    pub knowledge: PuzzleKnowledge,
    /// Candidates handed to the guess engine, skipped ones included.
    pub candidates_attempted: usize,
    pub oracle_calls: u64,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        self.state == AttemptState::Resolved
    }
}
