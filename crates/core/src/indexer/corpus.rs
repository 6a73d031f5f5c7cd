//! Corpus input.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::IndexError;

/// One article of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub title: String,
    pub text: String,
}

/// Read a JSON Lines corpus: one `{"title": ..., "text": ...}` per line.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn read_corpus(path: &Path) -> Result<Vec<CorpusRecord>, IndexError> {
    let file = File::open(path).map_err(|source| IndexError::CorpusIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_corpus(BufReader::new(file))
}

/// Parse JSON Lines records from any reader.
pub fn parse_corpus<R: BufRead>(reader: R) -> Result<Vec<CorpusRecord>, IndexError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| IndexError::CorpusIo {
            path: "<reader>".to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| IndexError::MalformedRecord {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
