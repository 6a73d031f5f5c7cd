//! Drives the candidate traversal into the guess engine.

use tokio::time::Duration;
use tracing::{debug, info};

use crate::oracle::{OracleError, PuzzleOracle};
use crate::search::{CandidateWalk, SearchOptions};
use crate::tree::LengthNode;

use super::engine::GuessEngine;
use super::knowledge::PuzzleKnowledge;
use super::types::{AttemptState, Resolution};

/// Solves one puzzle: walks the tree with the text profile and attempts
/// each proposed title until one resolves or the walk runs dry.
///
/// Strictly sequential: the oracle's per-puzzle state changes with every
/// guess, so no two guesses are ever in flight.
pub struct Resolver<'o, O: PuzzleOracle + ?Sized> {
    engine: GuessEngine<'o, O>,
    options: SearchOptions,
}

impl<'o, O: PuzzleOracle + ?Sized> Resolver<'o, O> {
    pub fn new(oracle: &'o O, options: SearchOptions, guess_delay: Duration) -> Self {
        Self {
            engine: GuessEngine::new(oracle, guess_delay),
            options,
        }
    }

    /// Run the attempt with fresh knowledge.
    ///
    /// Returns `Resolved` at the first candidate that completes the title, or
    /// `Exhausted` with whatever was learned along the way. Only oracle
    /// failures are errors.
    pub async fn solve(
        &mut self,
        root: &LengthNode,
        title_profile: &[usize],
        text_profile: &[usize],
    ) -> Result<Resolution, OracleError> {
        let knowledge = PuzzleKnowledge::new(title_profile.len());
        self.solve_with(root, title_profile, text_profile, knowledge)
            .await
    }

    /// Run the attempt starting from existing knowledge.
    pub async fn solve_with(
        &mut self,
        root: &LengthNode,
        title_profile: &[usize],
        text_profile: &[usize],
        mut knowledge: PuzzleKnowledge,
    ) -> Result<Resolution, OracleError> {
        let mut candidates_attempted = 0;

        if !knowledge.is_found() {
            for title in CandidateWalk::new(root, text_profile, self.options) {
                candidates_attempted += 1;
                let outcome = self
                    .engine
                    .attempt_title(title, title_profile, &mut knowledge)
                    .await?;
                if outcome.is_found() {
                    info!(
                        title = %knowledge.masked_title(),
                        candidates = candidates_attempted,
                        guesses = self.engine.oracle_calls(),
                        "Title found"
                    );
                    break;
                }
            }
        }

        let state = if knowledge.is_found() {
            AttemptState::Resolved
        } else {
            debug!(
                revealed = %knowledge.masked_title(),
                candidates = candidates_attempted,
                "Candidates exhausted"
            );
            AttemptState::Exhausted
        };

        Ok(Resolution {
            state,
            knowledge,
            candidates_attempted,
            oracle_calls: self.engine.oracle_calls(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockOracle;
    use crate::tree::Title;

    const EXHAUSTIVE: SearchOptions = SearchOptions {
        min_search_depth: 0,
    };

    fn tree() -> LengthNode {
        let mut root = LengthNode::new();
        root.insert(&[3, 4], Title::from_raw("Le Grand Meaulnes"));
        root.insert(&[3, 4], Title::from_raw("Le Petit Prince"));
        root.insert(&[3, 4], Title::from_raw("Le Petit Prince"));
        root.insert(&[3, 5], Title::from_raw("Le Petit Nicolas"));
        root
    }

    #[tokio::test]
    async fn test_resolves_and_stops_early() {
        let oracle = MockOracle::with_title("Le Petit Prince");
        let mut resolver = Resolver::new(&oracle, EXHAUSTIVE, Duration::ZERO);

        let resolution = resolver.solve(&tree(), &[2, 5, 6], &[3, 4]).await.unwrap();

        assert!(resolution.is_resolved());
        // "Le Grand Meaulnes" fails the length check on "Meaulnes" after two guesses.
        assert_eq!(
            oracle.guessed_words().await,
            vec!["Le", "Grand", "Petit", "Prince"]
        );
        assert_eq!(resolution.candidates_attempted, 2);
        assert_eq!(resolution.oracle_calls, 4);
    }

    #[tokio::test]
    async fn test_exhausted_keeps_partial_knowledge() {
        let oracle = MockOracle::with_title("Le Petit Chose");
        let mut resolver = Resolver::new(&oracle, EXHAUSTIVE, Duration::ZERO);

        let resolution = resolver.solve(&tree(), &[2, 5, 5], &[3, 4]).await.unwrap();

        assert_eq!(resolution.state, AttemptState::Exhausted);
        assert_eq!(resolution.knowledge.masked_title(), "Le Petit _");
        assert_eq!(resolution.candidates_attempted, 4);
    }

    #[tokio::test]
    async fn test_oracle_failure_aborts() {
        let oracle = MockOracle::with_title("Le Petit Prince");
        oracle.set_next_error(OracleError::Timeout).await;
        let mut resolver = Resolver::new(&oracle, EXHAUSTIVE, Duration::ZERO);

        let err = resolver
            .solve(&tree(), &[2, 5, 6], &[3, 4])
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Timeout));
    }

    #[tokio::test]
    async fn test_already_found_knowledge_makes_no_calls() {
        let oracle = MockOracle::with_title("Le");
        let mut resolver = Resolver::new(&oracle, EXHAUSTIVE, Duration::ZERO);
        let mut knowledge = PuzzleKnowledge::new(1);
        knowledge.apply_reveal("Le", &[0]);

        let resolution = resolver
            .solve_with(&tree(), &[2], &[3, 4], knowledge)
            .await
            .unwrap();

        assert!(resolution.is_resolved());
        assert_eq!(resolution.candidates_attempted, 0);
        assert_eq!(oracle.guess_count().await, 0);
    }
}
