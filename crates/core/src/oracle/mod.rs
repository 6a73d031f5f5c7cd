//! Puzzle oracle abstraction.
//!
//! This module provides a `PuzzleOracle` trait for the remote scoring
//! service, an HTTP implementation that scrapes the puzzle page and posts
//! guesses, and a pacer that spaces guesses out.

mod http;
mod pacer;
mod page;
mod types;

pub use http::HttpOracle;
pub use pacer::{GuessPacer, PacerStatus};
pub use page::parse_puzzle_page;
pub use types::*;
