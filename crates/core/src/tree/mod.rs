//! Length-indexed search tree.
//!
//! Titles are filed under the word-length sequence of the first words of
//! their article text. The tree is built once, optionally from independently
//! built shards combined with [`LengthNode::merge`], then persisted as a JSON
//! snapshot and only read afterwards.

mod node;
mod normalize;
mod snapshot;

pub use node::{LengthNode, LengthTree, Title, TreeStats};
pub use normalize::{split_words, text_profile, word_length};
pub use snapshot::{read_snapshot, write_snapshot, TITLES_KEY};

use thiserror::Error;

/// Errors that can occur while persisting or loading the tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot is not a valid tree: {0}")]
    Json(#[from] serde_json::Error),
}
