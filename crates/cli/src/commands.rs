//! Subcommand implementations.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::{json, Value};
use tracing::info;

use pedantix_core::schedule::duration_until;
use pedantix_core::{
    build_tree, read_corpus, read_snapshot, write_snapshot, BuildOptions, Config, HttpOracle,
    LengthNode, PuzzleOracle, Resolution, Resolver, ScheduleConfig, SearchOptions, TreeStats,
};

/// Read the corpus, build the index and write its snapshot.
pub async fn build(config: &Config, corpus: &Path, output: &Path) -> Result<TreeStats> {
    info!("Reading corpus from {:?}", corpus);
    let records =
        read_corpus(corpus).with_context(|| format!("Failed to read corpus {:?}", corpus))?;
    info!(records = records.len(), "Corpus loaded");

    let tree = build_tree(records, BuildOptions::from(&config.index))
        .await
        .context("Index build failed")?;

    write_snapshot(&tree, output)
        .with_context(|| format!("Failed to write snapshot {:?}", output))?;
    Ok(tree.stats())
}

/// Load the snapshot, optionally wait for the release, then solve the live
/// puzzle.
pub async fn solve(config: &Config, snapshot: &Path, wait: bool) -> Result<Resolution> {
    let tree = read_snapshot(snapshot, config.index.max_depth)
        .with_context(|| format!("Failed to load snapshot {:?}", snapshot))?;
    let stats = tree.stats();
    info!(nodes = stats.nodes, titles = stats.titles, "Snapshot loaded");

    if wait && config.schedule.enabled {
        wait_for_release(&config.schedule).await;
    }

    let oracle = HttpOracle::new(config.oracle.clone()).context("Failed to create HTTP client")?;
    solve_with_oracle(config, tree.root(), &oracle).await
}

/// Fetch the puzzle from `oracle` and run the resolver over `root`.
pub async fn solve_with_oracle<O: PuzzleOracle + ?Sized>(
    config: &Config,
    root: &LengthNode,
    oracle: &O,
) -> Result<Resolution> {
    let state = oracle
        .puzzle_state()
        .await
        .with_context(|| format!("Failed to fetch puzzle from {}", oracle.name()))?;
    info!(
        day = state.day,
        title_words = state.title_lengths.len(),
        text_words = state.text_lengths.len(),
        "Puzzle loaded"
    );

    let mut resolver = Resolver::new(
        oracle,
        SearchOptions::from(&config.search),
        Duration::from_millis(config.oracle.guess_delay_ms),
    );
    let resolution = resolver
        .solve(root, &state.title_lengths, &state.text_lengths)
        .await
        .context("Oracle failed during solve")?;

    let knowledge = &resolution.knowledge;
    info!(
        state = %resolution.state,
        title = %knowledge.masked_title(),
        tries = knowledge.tried_count(),
        close_words = knowledge.close_words().len(),
        "Attempt finished"
    );
    Ok(resolution)
}

async fn wait_for_release(schedule: &ScheduleConfig) {
    let wait = duration_until(&Local::now(), schedule.release_hour, schedule.release_minute)
        .to_std()
        .unwrap_or_default();
    info!(
        "Waiting {}s for the {:02}:{:02} release",
        wait.as_secs(),
        schedule.release_hour,
        schedule.release_minute
    );
    tokio::time::sleep(wait).await;
}

/// JSON report printed on stdout after `solve`.
pub fn summary(resolution: &Resolution) -> Value {
    let knowledge = &resolution.knowledge;
    json!({
        "state": resolution.state,
        "title": knowledge.masked_title(),
        "revealed": knowledge.revealed(),
        "tried": knowledge.tried_words(),
        "close_words": knowledge.close_words(),
        "candidates": resolution.candidates_attempted,
        "guesses": resolution.oracle_calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedantix_core::testing::{fixtures, MockOracle};
    use pedantix_core::tree::text_profile;
    use pedantix_core::AttemptState;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.index.workers = 2;
        config.oracle.guess_delay_ms = 0;
        config.search.min_search_depth = 0;
        config
    }

    fn write_corpus() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for record in fixtures::small_corpus() {
            writeln!(file, "{}", serde_json::to_string(&record).unwrap()).unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_build_writes_loadable_snapshot() {
        let corpus = write_corpus();
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("processed_data.json");
        let config = test_config();

        let stats = build(&config, corpus.path(), &output).await.unwrap();
        assert_eq!(stats.titles, 5);

        let tree = read_snapshot(&output, config.index.max_depth).unwrap();
        assert_eq!(tree.stats(), stats);
    }

    #[tokio::test]
    async fn test_build_missing_corpus_fails() {
        let dir = TempDir::new().unwrap();
        let result = build(
            &test_config(),
            Path::new("/nonexistent/corpus.jsonl"),
            &dir.path().join("out.json"),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_solve_with_mock_oracle() {
        let config = test_config();
        let tree = fixtures::tree(&[(vec![3, 4], "Le Petit Prince")]);
        let oracle = MockOracle::with_puzzle("Le Petit Prince", 812, vec![3, 4]);

        let resolution = solve_with_oracle(&config, tree.root(), &oracle)
            .await
            .unwrap();

        assert_eq!(resolution.state, AttemptState::Resolved);
        let report = summary(&resolution);
        assert_eq!(report["state"], "resolved");
        assert_eq!(report["title"], "Le Petit Prince");
        assert_eq!(report["guesses"], 3);
    }

    #[tokio::test]
    async fn test_solve_reports_exhaustion() {
        let config = test_config();
        let text = "Vol de nuit est un roman";
        let tree = fixtures::tree(&[(text_profile(text, 20), "Vol de nuit")]);
        let oracle = MockOracle::with_puzzle("Terre des hommes", 3, vec![9, 9]);

        let resolution = solve_with_oracle(&config, tree.root(), &oracle)
            .await
            .unwrap();

        assert_eq!(resolution.state, AttemptState::Exhausted);
        assert_eq!(summary(&resolution)["state"], "exhausted");
    }
}
