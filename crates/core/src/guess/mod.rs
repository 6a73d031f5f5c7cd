//! Guessing and feedback.
//!
//! [`GuessEngine`] tries a single candidate title word by word against the
//! oracle; [`Resolver`] feeds it candidates from the tree traversal until the
//! title is fully revealed. All state learned during an attempt lives in an
//! explicit [`PuzzleKnowledge`] value.

mod engine;
mod knowledge;
mod resolver;
mod types;

pub use engine::GuessEngine;
pub use knowledge::PuzzleKnowledge;
pub use resolver::Resolver;
pub use types::*;
