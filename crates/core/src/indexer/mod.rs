//! Corpus indexing.
//!
//! Reads (title, text) records and files every title under the word-length
//! sequence of the first words of its text.

mod builder;
mod corpus;

pub use builder::{build_shard, build_tree, index_record, split_range, BuildOptions};
pub use corpus::{parse_corpus, read_corpus, CorpusRecord};

use thiserror::Error;

/// Errors that can occur while building the index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to read corpus {path}: {source}")]
    CorpusIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed corpus record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Index worker for shard {shard} failed: {message}")]
    Worker { shard: usize, message: String },
}
