//! Sharded tree construction.
//!
//! The corpus is cut into contiguous shards, each shard builds its own tree
//! on a blocking worker, and the partial trees are folded together in shard
//! order. Workers share nothing, so the only ordering effect of the fold is
//! the order of titles inside a candidate list.

use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::tree::{text_profile, LengthTree, Title};

use super::corpus::CorpusRecord;
use super::IndexError;

/// Build parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub max_depth: usize,
    pub workers: usize,
    /// Records per progress log line.
    pub batch_size: usize,
}

impl From<&IndexConfig> for BuildOptions {
    fn from(config: &IndexConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            workers: config.workers,
            batch_size: config.batch_size,
        }
    }
}

/// Split `0..total` into at most `chunks` contiguous ranges.
///
/// The last range absorbs the remainder. Never returns more ranges than
/// there are items, and always returns at least one range.
pub fn split_range(total: usize, chunks: usize) -> Vec<Range<usize>> {
    let chunks = chunks.clamp(1, total.max(1));
    let size = total / chunks;
    let mut ranges: Vec<Range<usize>> =
        (0..chunks).map(|i| i * size..(i + 1) * size).collect();
    if let Some(last) = ranges.last_mut() {
        last.end = total;
    }
    ranges
}

/// Insert one record into `tree`.
pub fn index_record(tree: &mut LengthTree, record: &CorpusRecord) {
    let lengths = text_profile(&record.text, tree.max_depth());
    tree.insert(&lengths, Title::from_raw(&record.title));
}

/// Build a tree from a slice of records on the current thread.
pub fn build_shard(records: &[CorpusRecord], options: BuildOptions) -> LengthTree {
    let mut tree = LengthTree::new(options.max_depth);
    let batch_size = options.batch_size.max(1);
    for (batch_index, batch) in records.chunks(batch_size).enumerate() {
        debug!(
            from = batch_index * batch_size,
            to = batch_index * batch_size + batch.len(),
            "Processing batch"
        );
        for record in batch {
            index_record(&mut tree, record);
        }
    }
    tree
}

/// Build the full tree, one blocking task per shard.
pub async fn build_tree(
    records: Vec<CorpusRecord>,
    options: BuildOptions,
) -> Result<LengthTree, IndexError> {
    let ranges = split_range(records.len(), options.workers);
    info!(
        records = records.len(),
        shards = ranges.len(),
        max_depth = options.max_depth,
        "Building length tree"
    );

    let records = Arc::new(records);
    let handles: Vec<_> = ranges
        .into_iter()
        .map(|range| {
            let records = Arc::clone(&records);
            tokio::task::spawn_blocking(move || build_shard(&records[range], options))
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    let mut tree = LengthTree::new(options.max_depth);
    for (shard, result) in results.into_iter().enumerate() {
        let partial = result.map_err(|e| IndexError::Worker {
            shard,
            message: e.to_string(),
        })?;
        debug!(shard = shard, titles = partial.stats().titles, "Shard merged");
        tree = tree.merge(partial);
    }

    let stats = tree.stats();
    info!(
        nodes = stats.nodes,
        leaves = stats.leaves,
        titles = stats.titles,
        depth = stats.max_depth,
        "Length tree built"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{search, SearchOptions};
    use crate::testing::fixtures::{record, small_corpus};

    fn options(workers: usize) -> BuildOptions {
        BuildOptions {
            max_depth: 20,
            workers,
            batch_size: 2,
        }
    }

    #[test]
    fn test_split_range_remainder_in_last() {
        assert_eq!(split_range(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(split_range(4, 4), vec![0..1, 1..2, 2..3, 3..4]);
    }

    #[test]
    fn test_split_range_more_chunks_than_items() {
        assert_eq!(split_range(2, 16), vec![0..1, 1..2]);
        assert_eq!(split_range(0, 16), vec![0..0]);
        assert_eq!(split_range(5, 0), vec![0..5]);
    }

    #[test]
    fn test_index_record_uses_text_lengths() {
        let mut tree = LengthTree::new(3);
        index_record(&mut tree, &record("Le Petit Prince", "Le Petit Prince est une œuvre"));

        let titles = tree.root().candidates_at(&[2, 5, 6]).unwrap();
        assert_eq!(titles[0].words(), &["Le", "Petit", "Prince"]);
    }

    #[test]
    fn test_empty_text_files_title_at_root() {
        let mut tree = LengthTree::new(20);
        index_record(&mut tree, &record("Page vide", ""));
        assert_eq!(tree.root().titles()[0].to_string(), "Page vide");
    }

    #[test]
    fn test_truncation_collision_keeps_both_titles() {
        let shared = "un deux trois quatre";
        let mut tree = LengthTree::new(3);
        index_record(&mut tree, &record("Alpha", &format!("{} cinq", shared)));
        index_record(&mut tree, &record("Beta", &format!("{} sixième", shared)));

        let titles = tree.root().candidates_at(&[2, 4, 5]).unwrap();
        assert_eq!(titles.len(), 2);
    }

    #[tokio::test]
    async fn test_parallel_build_matches_sequential() {
        let corpus = small_corpus();
        let sequential = build_shard(&corpus, options(1));
        let parallel = build_tree(corpus.clone(), options(3)).await.unwrap();

        assert_eq!(sequential.stats(), parallel.stats());
        // Shards are contiguous and merged in order, so order is preserved too.
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn test_every_record_is_findable() {
        let corpus = small_corpus();
        let tree = build_tree(corpus.clone(), options(4)).await.unwrap();
        let exhaustive = SearchOptions {
            min_search_depth: 0,
        };

        for rec in &corpus {
            let profile = text_profile(&rec.text, 20);
            let found = search(tree.root(), &profile, exhaustive);
            let expected = Title::from_raw(&rec.title);
            assert!(found.contains(&&expected), "{} not found", rec.title);
        }
    }

    #[tokio::test]
    async fn test_build_empty_corpus() {
        let tree = build_tree(Vec::new(), options(8)).await.unwrap();
        assert!(tree.root().is_dead_end());
    }
}
