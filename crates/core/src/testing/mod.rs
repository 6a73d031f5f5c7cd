//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the puzzle oracle, allowing the full
//! resolve loop to be exercised without the live site.
//!
//! # Example
//!
//! ```rust,ignore
//! use pedantix_core::testing::{fixtures, MockOracle};
//!
//! let oracle = MockOracle::with_puzzle("Le Petit Prince", 812, vec![3, 4]);
//! let tree = fixtures::tree(&[(vec![3, 4], "Le Petit Prince")]);
//!
//! let mut resolver = Resolver::new(&oracle, SearchOptions::default(), Duration::ZERO);
//! let resolution = resolver.solve(tree.root(), &[2, 5, 6], &[3, 4]).await?;
//! ```

mod mock_oracle;

pub use mock_oracle::{MockOracle, RecordedGuess};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::indexer::CorpusRecord;
    use crate::tree::{LengthTree, Title};

    /// Depth bound used by fixture trees.
    pub const FIXTURE_MAX_DEPTH: usize = 20;

    /// Build a tree from `(path, raw title)` pairs.
    pub fn tree(entries: &[(Vec<usize>, &str)]) -> LengthTree {
        let mut tree = LengthTree::new(FIXTURE_MAX_DEPTH);
        for (path, raw) in entries {
            tree.insert(path, Title::from_raw(raw));
        }
        tree
    }

    /// Create a corpus record.
    pub fn record(title: &str, text: &str) -> CorpusRecord {
        CorpusRecord {
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    /// A small corpus of French article openings.
    pub fn small_corpus() -> Vec<CorpusRecord> {
        vec![
            record(
                "Le Petit Prince",
                "Le Petit Prince est une œuvre de langue française, la plus connue d'Antoine de Saint-Exupéry.",
            ),
            record(
                "Vol de nuit",
                "Vol de nuit est un roman d'Antoine de Saint-Exupéry publié en 1931.",
            ),
            record(
                "Terre des hommes",
                "Terre des hommes est un essai d'Antoine de Saint-Exupéry paru en 1939.",
            ),
            record(
                "Citadelle (Saint-Exupéry)",
                "Citadelle est une œuvre posthume d'Antoine de Saint-Exupéry.",
            ),
            record("Page vide", ""),
        ]
    }
}
